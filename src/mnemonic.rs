/*!
  The instruction set, represented as a map from mnemonic to statement specification.

  Each mnemonic has a format and a sequence of opcode fields. The first field is the primary
  opcode (the `op` field of the first word). Primary codes 0-13 are RRR instructions and need
  nothing more. Code 14 escapes to the expanded (EXP) instructions and code 15 escapes to the
  indexed (RX) instructions; both are followed by a secondary opcode selecting the operation.

  A third field, when present, is a literal supplying an operand the programmer doesn't
  write. `jumpeq loop[R0]` is `jumpc1 E,loop[R0]` with the condition code bit filled in,
  and `and R1,R2,R3` is `logicw R1,R2,R3,1` with the logic function filled in. Those
  mnemonics are pseudo-instructions: they have no encoding of their own.

  Directives have an empty opcode sequence; they are told apart by format alone.

  Lookups are exact and case sensitive. Every mnemonic is lowercase.
*/

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;
use strum_macros::{Display as StrumDisplay, IntoStaticStr};

use crate::bits::{BIT_CC_C, BIT_CC_E, BIT_CC_V, BIT_CC_g, BIT_CC_l, BIT_CC_v};
use crate::encoding::{ESCAPE_EXP, ESCAPE_RX};
use crate::format::{Format, FormatFamily, OperandKind};

// Logic function codes: the truth table of `f(x,y)` read as a 4 bit number.
pub const LOGIC_AND: u8 = 1;
pub const LOGIC_XOR: u8 = 6;
pub const LOGIC_OR:  u8 = 7;
pub const LOGIC_INV: u8 = 12;

/// What kind of statement a mnemonic introduces.
#[derive(StrumDisplay, IntoStaticStr, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum EntryKind {
  Instruction,
  Pseudo,
  Directive,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MnemonicEntry {
  pub mnemonic : DefaultAtom,
  pub format   : Format,
  /// Primary, secondary, and tertiary opcode fields, as many as the operation needs.
  pub opcode   : &'static [u8],
  pub pseudo   : bool,
}

impl MnemonicEntry {
  pub fn primary(&self) -> Option<u8> {
    self.opcode.get(0).copied()
  }

  pub fn secondary(&self) -> Option<u8> {
    self.opcode.get(1).copied()
  }

  /// The literal filled in by a pseudo-instruction (or by `jump`, which fixes `d` to 0).
  pub fn tertiary(&self) -> Option<u8> {
    self.opcode.get(2).copied()
  }

  pub fn word_count(&self) -> u32 {
    self.format.word_count()
  }

  pub fn kind(&self) -> EntryKind {
    match (self.pseudo, self.format.is_instruction()) {
      (true, _)      => EntryKind::Pseudo,
      (false, true)  => EntryKind::Instruction,
      (false, false) => EntryKind::Directive,
    }
  }

  /// Whether this entry's opcode sequence strictly extends `other`'s in the same family.
  pub fn extends(&self, other: &MnemonicEntry) -> bool {
    self.format.family() == other.format.family()
      && other.opcode.len() < self.opcode.len()
      && self.opcode.starts_with(other.opcode)
  }
}

impl Display for MnemonicEntry {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{} {} [{}]{}",
      self.mnemonic,
      self.format,
      self.opcode.iter().map(u8::to_string).collect::<Vec<String>>().join(","),
      if self.pseudo { " pseudo" } else { "" }
    )
  }
}

/// One row of the instruction set below.
struct Spec(&'static str, Format, &'static [u8], bool);

const X: u8 = ESCAPE_EXP;
const R: u8 = ESCAPE_RX;

#[rustfmt::skip]
static STATEMENT_SPECS: &[Spec] = &[
  // Empty statement and directives //
  Spec("",         Format::Empty,     &[], false),
  Spec("data",     Format::Data,      &[], false),
  Spec("module",   Format::DirModule, &[], false),
  Spec("import",   Format::DirImport, &[], false),
  Spec("export",   Format::DirExport, &[], false),
  Spec("org",      Format::DirOrg,    &[], false),
  Spec("equ",      Format::DirEqu,    &[], false),

  // RRR instructions: op 0-13 //
  Spec("add",      Format::Rrr, &[0],  false),
  Spec("sub",      Format::Rrr, &[1],  false),
  Spec("mul",      Format::Rrr, &[2],  false),
  Spec("div",      Format::Rrr, &[3],  false),
  Spec("cmp",      Format::Rr,  &[4],  false),
  Spec("cmplt",    Format::Rrr, &[5],  false),
  Spec("cmpeq",    Format::Rrr, &[6],  false),
  Spec("cmpgt",    Format::Rrr, &[7],  false),
  Spec("invold",   Format::Rr,  &[8],  false),
  Spec("andold",   Format::Rrr, &[9],  false),
  Spec("orold",    Format::Rrr, &[10], false),
  Spec("xorold",   Format::Rrr, &[11], false),
  Spec("nop",      Format::Rrr, &[12], false),
  Spec("trap",     Format::Rrr, &[13], false),

  // RX instructions: op 15, secondary in b //
  Spec("lea",      Format::Rx,  &[R, 0],    false),
  Spec("load",     Format::Rx,  &[R, 1],    false),
  Spec("store",    Format::Rx,  &[R, 2],    false),
  Spec("jump",     Format::Jx,  &[R, 3, 0], false),
  Spec("jumpc0",   Format::Kx,  &[R, 4],    false),
  Spec("jumpc1",   Format::Kx,  &[R, 5],    false),
  Spec("jumpf",    Format::Rx,  &[R, 6],    false),
  Spec("jumpt",    Format::Rx,  &[R, 7],    false),
  Spec("jal",      Format::Rx,  &[R, 8],    false),
  Spec("testset",  Format::Rx,  &[R, 9],    false),

  // EXP instructions: op 14, secondary in ab //
  // One word: secondary 0-7
  Spec("rfi",      Format::Exp0,     &[X, 0],  false),
  // Two words: secondary >= 8
  Spec("save",     Format::RrxExp,   &[X, 8],  false),
  Spec("restore",  Format::RrxExp,   &[X, 9],  false),
  Spec("getctl",   Format::RcExp,    &[X, 10], false),
  Spec("putctl",   Format::RcExp,    &[X, 11], false),
  Spec("execute",  Format::RrExp,    &[X, 12], false),
  Spec("push",     Format::RrrExp,   &[X, 13], false),
  Spec("pop",      Format::RrrExp,   &[X, 14], false),
  Spec("top",      Format::RrrExp,   &[X, 15], false),
  Spec("shiftl",   Format::RrkExp,   &[X, 16], false),
  Spec("shiftr",   Format::RrkExp,   &[X, 17], false),
  Spec("extract",  Format::RrkkExp,  &[X, 18], false),
  Spec("extracti", Format::RrkkExp,  &[X, 19], false),
  Spec("inject",   Format::RrrkkExp, &[X, 20], false),
  Spec("injecti",  Format::RrrkkExp, &[X, 21], false),
  Spec("logicw",   Format::RrrkExp,  &[X, 22], false),
  Spec("logicb",   Format::RrrkkExp, &[X, 23], false),

  // Pseudo-instructions //
  // jumpc0 fixes the condition code bit in d: jump if the bit is 0
  Spec("jumple",   Format::Jx, &[R, 4, BIT_CC_g], true),
  Spec("jumpne",   Format::Jx, &[R, 4, BIT_CC_E], true),
  Spec("jumpge",   Format::Jx, &[R, 4, BIT_CC_l], true),
  Spec("jumpnv",   Format::Jx, &[R, 4, BIT_CC_v], true),
  Spec("jumpnvu",  Format::Jx, &[R, 4, BIT_CC_V], true),
  Spec("jumpnco",  Format::Jx, &[R, 4, BIT_CC_C], true),
  // jumpc1: jump if the bit is 1
  Spec("jumplt",   Format::Jx, &[R, 5, BIT_CC_l], true),
  Spec("jumpeq",   Format::Jx, &[R, 5, BIT_CC_E], true),
  Spec("jumpgt",   Format::Jx, &[R, 5, BIT_CC_g], true),
  Spec("jumpv",    Format::Jx, &[R, 5, BIT_CC_v], true),
  Spec("jumpvu",   Format::Jx, &[R, 5, BIT_CC_V], true),
  Spec("jumpco",   Format::Jx, &[R, 5, BIT_CC_C], true),

  // logicw fixes the logic function; inv also leaves out the second source, which is R0
  Spec("inv",      Format::RrExp,    &[X, 22, LOGIC_INV], true),
  Spec("and",      Format::RrrExp,   &[X, 22, LOGIC_AND], true),
  Spec("or",       Format::RrrExp,   &[X, 22, LOGIC_OR],  true),
  Spec("xor",      Format::RrrExp,   &[X, 22, LOGIC_XOR], true),
  // logicb
  Spec("invb",     Format::RrkExp,   &[X, 23, LOGIC_INV], true),
  Spec("andb",     Format::RrrkExp,  &[X, 23, LOGIC_AND], true),
  Spec("orb",      Format::RrrkExp,  &[X, 23, LOGIC_OR],  true),
  Spec("xorb",     Format::RrrkExp,  &[X, 23, LOGIC_XOR], true),

  // field Rd,g,h is injecti Rd,R0,R0,g,h: a field of ones in bits g..h. The literal is the
  // first omitted register.
  Spec("field",    Format::RkkExp,   &[X, 21, 0], true),
];

/**
  The mnemonic table. Entries are kept in declaration order, which is the order used for
  listings; `index` maps each mnemonic to its position. The index is keyed by plain strings
  so that looking up arbitrary source text never interns it.
*/
pub struct MnemonicTable {
  entries : Vec<MnemonicEntry>,
  index   : HashMap<String, usize>,
}

impl MnemonicTable {

  pub fn new() -> MnemonicTable {
    let entries =
      STATEMENT_SPECS
        .iter()
        .map(|Spec(mnemonic, format, opcode, pseudo)| MnemonicEntry{
          mnemonic : DefaultAtom::from(*mnemonic),
          format   : *format,
          opcode   : *opcode,
          pseudo   : *pseudo,
        })
        .collect();
    MnemonicTable::from_entries(entries)
  }

  /**
    Builds a table from arbitrary entries, for instance a variant instruction set under
    development. The first entry for a mnemonic wins; nothing here checks the encodings,
    that is what `validate` is for.
  */
  pub fn from_entries(entries: Vec<MnemonicEntry>) -> MnemonicTable {
    let mut index = HashMap::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
      index.entry(entry.mnemonic.to_string()).or_insert(i);
    }
    MnemonicTable{ entries, index }
  }

  pub fn lookup(&self, mnemonic: &str) -> Option<&MnemonicEntry> {
    let entry = self.index.get(mnemonic).map(|i| &self.entries[*i]);
    #[cfg(feature = "trace_lookups")]
    {
      if entry.is_none() {
        log::trace!("unknown mnemonic {:?}", mnemonic);
      }
    }
    entry
  }

  pub fn contains(&self, mnemonic: &str) -> bool {
    self.index.contains_key(mnemonic)
  }

  pub fn entries(&self) -> &[MnemonicEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entries whose format belongs to `family`, in declaration order.
  pub fn in_family(&self, family: FormatFamily) -> impl Iterator<Item=&MnemonicEntry> {
    self.entries.iter().filter(move |e| e.format.family() == family)
  }

  /// The real instruction a pseudo-instruction is built on. `None` for anything else.
  pub fn base_of(&self, entry: &MnemonicEntry) -> Option<&MnemonicEntry> {
    match entry.pseudo {
      false => None,
      true  => self.entries.iter().find(|e| !e.pseudo && entry.extends(e)),
    }
  }

  /**
    The operands of the base instruction that a pseudo-instruction leaves out, in the base
    instruction's order. The trailing opcode literal supplies the omitted constant, or the
    omitted register when no constant is left out (`field` fixes R0 that way). Any other
    omitted register is R0. `None` if `entry` has no base, or if it has an operand its base
    doesn't.
  */
  pub fn omitted_operands(&self, entry: &MnemonicEntry) -> Option<Vec<OperandKind>> {
    let base = self.base_of(entry)?;
    let mut written: Vec<OperandKind> = entry.format.operands().to_vec();
    let mut omitted = Vec::new();

    for kind in base.format.operands() {
      match written.iter().position(|w| w == kind) {
        Some(i) => { written.remove(i); }
        None    => omitted.push(*kind),
      }
    }

    match written.is_empty() {
      true  => Some(omitted),
      false => None
    }
  }
}

/**
  Whether `omitted` is a shape one trailing literal can account for: at least one operand,
  at most one of them a constant, and every other one a register (implicitly R0).
*/
pub fn literal_covers(omitted: &[OperandKind]) -> bool {
  let constants = omitted.iter().filter(|k| **k == OperandKind::Constant).count();
  let registers = omitted.iter().filter(|k| **k == OperandKind::Register).count();
  !omitted.is_empty() && constants <= 1 && constants + registers == omitted.len()
}

impl Default for MnemonicTable {
  fn default() -> Self {
    MnemonicTable::new()
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bits::ConditionBit;

  #[test]
  fn concrete_entries(){
    let table = MnemonicTable::new();

    let add = table.lookup("add").unwrap();
    assert_eq!(add.format, Format::Rrr);
    assert_eq!(add.opcode, &[0]);
    assert_eq!(add.kind(), EntryKind::Instruction);

    let load = table.lookup("load").unwrap();
    assert_eq!(load.format, Format::Rx);
    assert_eq!(load.opcode, &[15, 1]);

    let jumpeq = table.lookup("jumpeq").unwrap();
    assert_eq!(jumpeq.format, Format::Jx);
    assert_eq!(jumpeq.opcode, &[15, 5, ConditionBit::Equal.index()]);
    assert!(jumpeq.pseudo);

    let and = table.lookup("and").unwrap();
    assert!(and.pseudo);
    assert_eq!(and.opcode, &[14, 22, 1]);
    assert_eq!(and.format.family(), table.lookup("logicw").unwrap().format.family());
  }

  #[test]
  fn unknown_and_case(){
    let table = MnemonicTable::new();
    assert!(table.lookup("ADD").is_none());
    assert!(table.lookup("frobnicate").is_none());
    assert!(!table.contains("Load"));
    assert!(table.contains("load"));
  }

  #[test]
  fn directives_have_no_opcode(){
    let table = MnemonicTable::new();
    for name in &["data", "module", "import", "export", "org", "equ", ""] {
      let entry = table.lookup(name).unwrap();
      assert!(entry.opcode.is_empty(), "{}", name);
      assert!(!entry.pseudo);
    }
    assert_eq!(table.lookup("").unwrap().format, Format::Empty);
    assert_eq!(table.lookup("equ").unwrap().kind(), EntryKind::Directive);
  }

  #[test]
  fn pseudo_instructions_have_a_base(){
    let table = MnemonicTable::new();
    let base = |name: &str| {
      let entry = table.lookup(name).unwrap();
      table.base_of(entry).map(|e| e.mnemonic.to_string())
    };
    assert_eq!(base("jumpeq"), Some("jumpc1".to_string()));
    assert_eq!(base("jumpne"), Some("jumpc0".to_string()));
    assert_eq!(base("xor"),    Some("logicw".to_string()));
    assert_eq!(base("orb"),    Some("logicb".to_string()));
    assert_eq!(base("field"),  Some("injecti".to_string()));
    assert_eq!(base("add"),    None);
  }

  #[test]
  fn jump_is_not_a_pseudo(){
    let table = MnemonicTable::new();
    let jump = table.lookup("jump").unwrap();
    assert!(!jump.pseudo);
    assert_eq!(jump.tertiary(), Some(0));
    assert_eq!(jump.word_count(), 2);
  }

  #[test]
  fn families(){
    let table = MnemonicTable::new();
    assert_eq!(table.in_family(FormatFamily::Primitive).count(), 14);
    assert_eq!(table.in_family(FormatFamily::Indexed).count(), 22);
    assert!(table.in_family(FormatFamily::Expanded).all(|e| e.primary() == Some(14)));
    assert_eq!(table.in_family(FormatFamily::Directive).count(), 5);
  }

  #[test]
  fn omitted_operands_are_one_literal_and_r0s(){
    let table = MnemonicTable::new();
    let omitted = |name: &str| table.omitted_operands(table.lookup(name).unwrap()).unwrap();

    assert_eq!(omitted("jumpeq"), vec![OperandKind::Constant]);
    assert_eq!(omitted("and"),    vec![OperandKind::Constant]);
    assert_eq!(omitted("inv"),    vec![OperandKind::Register, OperandKind::Constant]);
    assert_eq!(omitted("invb"),   vec![OperandKind::Register, OperandKind::Constant]);
    assert_eq!(omitted("field"),  vec![OperandKind::Register, OperandKind::Register]);
    assert!(table.omitted_operands(table.lookup("logicw").unwrap()).is_none());

    for entry in table.entries().iter().filter(|e| e.pseudo) {
      let omitted = table.omitted_operands(entry).unwrap();
      assert!(literal_covers(&omitted), "{}", entry);
      assert_eq!(
        table.base_of(entry).unwrap().format.operands().len(),
        entry.format.operands().len() + omitted.len()
      );
    }
  }

  #[test]
  fn literal_coverage(){
    assert!(literal_covers(&[OperandKind::Constant]));
    assert!(literal_covers(&[OperandKind::Register, OperandKind::Register]));
    assert!(!literal_covers(&[]));
    assert!(!literal_covers(&[OperandKind::Constant, OperandKind::Constant]));
    assert!(!literal_covers(&[OperandKind::Address]));
  }

  #[test]
  fn tables_from_entries(){
    let entry = |name: &str, opcode: &'static [u8]| MnemonicEntry{
      mnemonic: DefaultAtom::from(name), format: Format::Rrr, opcode, pseudo: false
    };
    let table = MnemonicTable::from_entries(vec![entry("add", &[0]), entry("add", &[1]), entry("sub", &[1])]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.lookup("add").unwrap().opcode, &[0]);
    assert_eq!(table.lookup("sub").unwrap().opcode, &[1]);
    assert!(table.lookup("mul").is_none());
  }

  #[test]
  fn lookups_take_arbitrary_text(){
    let table = MnemonicTable::new();
    let text = format!("{}{}", "jump", "eq");
    assert_eq!(table.lookup(&text).unwrap().opcode, &[15, 5, 2]);
    assert!(table.lookup("not a mnemonic at all").is_none());
    assert!(!table.contains("JumpEq"));
  }

  #[test]
  fn display(){
    let table = MnemonicTable::new();
    assert_eq!(table.lookup("jumpeq").unwrap().to_string(), "jumpeq JX [15,5,2] pseudo");
    assert_eq!(table.lookup("add").unwrap().to_string(), "add RRR [0]");
  }
}
