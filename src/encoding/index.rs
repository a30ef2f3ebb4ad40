use std::collections::HashMap;

use crate::format::FormatFamily;
use crate::mnemonic::{MnemonicEntry, MnemonicTable};
use super::binary::{decode_opcode_fields, rx_tertiary, Word};

/**
  The reverse of the mnemonic table: from opcode fields to mnemonic. This is the table an
  emulator's decoder or a disassembler consults.

  `exact` maps every complete opcode sequence (pseudo-instructions included) to its entry.
  `selectors` maps the fields a first word carries (`[op]`, `[14, ab]`, `[15, b]`) to the real
  instruction they select.
*/
pub struct OpcodeIndex<'t> {
  exact     : HashMap<&'t [u8], &'t MnemonicEntry>,
  selectors : HashMap<Vec<u8>, &'t MnemonicEntry>,
}

impl<'t> OpcodeIndex<'t> {

  pub fn new(table: &'t MnemonicTable) -> OpcodeIndex<'t> {
    let mut exact     = HashMap::new();
    let mut selectors = HashMap::new();

    for entry in table.entries().iter().filter(|e| e.format.is_instruction()) {
      exact.entry(entry.opcode).or_insert(entry);
      if !entry.pseudo {
        let selector: Vec<u8> = entry.opcode.iter().take(2).copied().collect();
        selectors.entry(selector).or_insert(entry);
      }
    }

    OpcodeIndex{ exact, selectors }
  }

  /// The entry whose opcode sequence is exactly `fields`.
  pub fn resolve(&self, fields: &[u8]) -> Option<&'t MnemonicEntry> {
    self.exact.get(fields).copied()
  }

  /// The real instruction selected by the opcode fields of a first word.
  pub fn decode(&self, word: Word) -> Option<&'t MnemonicEntry> {
    self.selectors.get(&decode_opcode_fields(word)).copied()
  }

  /**
    Like `decode`, but prefers a pseudo-instruction when the word carries its tertiary
    field: `0xf205` decodes to `jumpeq` rather than `jumpc1`. Only RX instructions keep a
    tertiary field in the first word, so EXP words always give the real instruction.
  */
  pub fn decode_alias(&self, word: Word) -> Option<&'t MnemonicEntry> {
    let real = self.decode(word)?;
    if real.format.family() != FormatFamily::Indexed {
      return Some(real);
    }

    let mut fields = decode_opcode_fields(word);
    fields.push(rx_tertiary(word));
    match self.resolve(&fields) {
      Some(alias) => Some(alias),
      None        => Some(real)
    }
  }

  pub fn len(&self) -> usize {
    self.exact.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exact.is_empty()
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_exact_sequences(){
    let table = MnemonicTable::new();
    let index = OpcodeIndex::new(&table);
    assert_eq!(&*index.resolve(&[0]).unwrap().mnemonic, "add");
    assert_eq!(&*index.resolve(&[15, 1]).unwrap().mnemonic, "load");
    assert_eq!(&*index.resolve(&[15, 5, 2]).unwrap().mnemonic, "jumpeq");
    assert_eq!(&*index.resolve(&[14, 22, 7]).unwrap().mnemonic, "or");
    assert!(index.resolve(&[15, 12]).is_none());
    assert!(index.resolve(&[]).is_none());
  }

  #[test]
  fn decode_words(){
    let table = MnemonicTable::new();
    let index = OpcodeIndex::new(&table);
    assert_eq!(&*index.decode(0x0123).unwrap().mnemonic, "add");
    assert_eq!(&*index.decode(0x4120).unwrap().mnemonic, "cmp");
    assert_eq!(&*index.decode(0xf3a2).unwrap().mnemonic, "store");
    assert_eq!(&*index.decode(0xf205).unwrap().mnemonic, "jumpc1");
    assert_eq!(&*index.decode(0xe30a).unwrap().mnemonic, "getctl");
    assert_eq!(&*index.decode(0xf0a3).unwrap().mnemonic, "jump");
    // Unassigned secondary opcodes.
    assert!(index.decode(0xf00c).is_none());
    assert!(index.decode(0xe003).is_none());
  }

  #[test]
  fn decode_prefers_aliases(){
    let table = MnemonicTable::new();
    let index = OpcodeIndex::new(&table);
    assert_eq!(&*index.decode_alias(0xf205).unwrap().mnemonic, "jumpeq");
    assert_eq!(&*index.decode_alias(0xf104).unwrap().mnemonic, "jumple");
    // No alias fixes bit 0 of jumpc1.
    assert_eq!(&*index.decode_alias(0xf005).unwrap().mnemonic, "jumpc1");
    assert_eq!(&*index.decode_alias(0xe016).unwrap().mnemonic, "logicw");
    assert_eq!(&*index.decode_alias(0x2000).unwrap().mnemonic, "mul");
  }
}
