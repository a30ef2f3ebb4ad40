/*!
  Statement formats. Every assembly language statement has exactly one format, which
  determines how many machine words the statement generates and which operands it expects.

  The assembly language formats are finer grained than the machine language formats. The
  machine has three instruction layouts, selected by the primary opcode: RRR (codes 0-13),
  EXP (the escape code 14) and RX (the escape code 15). An assembly format like `JX` is
  still an RX instruction in memory; it merely omits the `d` operand, which is supplied by
  an opcode field instead. The `FormatFamily` of a format names its machine layout.

  The numeric codes of the variants are stable and are what a statement record carries.
  Consequently, the order the variants are listed below is significant.
*/

use std::convert::TryFrom;

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The label used for any format code outside the enumeration.
pub const UNKNOWN_LABEL: &str = "UNKNOWN";

#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum Format {
  // Primitive instructions //
  #[strum(to_string = "RRR")]         Rrr         =  0, // R1,R2,R3
  #[strum(to_string = "RR")]          Rr          =  1, // R1,R2       (RRR omitting the d or b field)

  // Indexed instructions //
  #[strum(to_string = "RX")]          Rx          =  2, // R1,xyz[R2]
  #[strum(to_string = "KX")]          Kx          =  3, // 3,xyz[R2]
  #[strum(to_string = "JX")]          Jx          =  4, // loop[R2]    (RX omitting d)

  // Expanded instructions //
  #[strum(to_string = "EXP0")]        Exp0        =  5, // (no operand)
  #[strum(to_string = "RREXP")]       RrExp       =  6, // R1,R2
  #[strum(to_string = "RRREXP")]      RrrExp      =  7, // R1,R2,R3
  #[strum(to_string = "RRKEXP")]      RrkExp      =  8, // R1,R2,3
  #[strum(to_string = "RKKEXP")]      RkkExp      =  9, // R1,3,5
  #[strum(to_string = "RRRKEXP")]     RrrkExp     = 10, // R1,R2,R3,k     logicw
  #[strum(to_string = "RRKKEXP")]     RrkkExp     = 11, // R1,R2,3,5
  #[strum(to_string = "RRRKKEXP")]    RrrkkExp    = 12, // R1,R2,R3,g,h   logicb
  #[strum(to_string = "RRXEXP")]      RrxExp      = 13, // save R4,R7,3[R14]
  #[strum(to_string = "RCEXP")]       RcExp       = 14, // getctl R4,mask

  // Data and directives //
  #[strum(to_string = "DATA")]        Data        = 15, // -42
  #[strum(to_string = "COMMENT")]     Comment     = 16, // ; full line comment
  #[strum(to_string = "DirModule")]   DirModule   = 17,
  #[strum(to_string = "DirImport")]   DirImport   = 18,
  #[strum(to_string = "DirExport")]   DirExport   = 19,
  #[strum(to_string = "DirOrg")]      DirOrg      = 20,
  #[strum(to_string = "DirEqu")]      DirEqu      = 21,

  // Markers left by the parser //
  #[strum(to_string = "UNKNOWN")]     Unknown     = 22,
  #[strum(to_string = "EMPTY")]       Empty       = 23,
  #[strum(to_string = "NOOPERATION")] NoOperation = 24,
  #[strum(to_string = "NOOPERAND")]   NoOperand   = 25,
}

pub const MAX_FORMAT_CODE: u8 = 25u8;

/// The machine language layout a format belongs to.
#[derive(StrumDisplay, IntoStaticStr, EnumIter, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum FormatFamily {
  /// RRR instructions, primary opcode 0-13.
  Primitive,
  /// RX instructions behind the escape code 15.
  Indexed,
  /// EXP instructions behind the escape code 14.
  Expanded,
  /// A literal data word.
  Data,
  /// Assembler directives, which generate no code.
  Directive,
  /// Comments, empty statements, and the parser's error markers.
  Marker,
}

/// One operand position in the assembly language syntax of a format.
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum OperandKind {
  /// A general register `R0`..`R15`.
  Register,
  /// A small constant packed into a 4 bit field.
  Constant,
  /// `disp[Rn]`, a displacement word plus an index register.
  Address,
  /// The name of a control register, see `ctlreg`.
  ControlRegister,
  /// An expression giving a full word.
  Value,
  /// A symbol name.
  Identifier,
}

use OperandKind::{Address, Constant, ControlRegister, Identifier, Register, Value};

impl Format {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn from_code(code: u8) -> Option<Format> {
    Format::try_from(code).ok()
  }

  /// Parses a display label (`"RRR"`, `"DirOrg"`, ...) back into a format.
  pub fn from_label(label: &str) -> Option<Format> {
    label.parse::<Format>().ok()
  }

  /// The diagnostic label of the format.
  pub fn name(&self) -> &'static str {
    (*self).into()
  }

  /**
    The number of words of code generated for a statement of this format. Zero means the
    statement emits no machine word; it is not an error.
  */
  pub fn word_count(&self) -> u32 {
    match self {
      Format::Rrr | Format::Rr | Format::Exp0 | Format::Data => 1,

      Format::Rx     | Format::Kx      | Format::Jx
      | Format::RrExp  | Format::RrrExp  | Format::RrkExp  | Format::RkkExp
      | Format::RrrkExp | Format::RrkkExp | Format::RrrkkExp
      | Format::RrxExp | Format::RcExp => 2,

      Format::Comment
      | Format::DirModule | Format::DirImport | Format::DirExport
      | Format::DirOrg    | Format::DirEqu
      | Format::Unknown   | Format::Empty
      | Format::NoOperation | Format::NoOperand => 0,
    }
  }

  pub fn family(&self) -> FormatFamily {
    match self {
      Format::Rrr | Format::Rr => FormatFamily::Primitive,

      Format::Rx | Format::Kx | Format::Jx => FormatFamily::Indexed,

      Format::Exp0
      | Format::RrExp  | Format::RrrExp  | Format::RrkExp  | Format::RkkExp
      | Format::RrrkExp | Format::RrkkExp | Format::RrrkkExp
      | Format::RrxExp | Format::RcExp => FormatFamily::Expanded,

      Format::Data => FormatFamily::Data,

      Format::DirModule | Format::DirImport | Format::DirExport
      | Format::DirOrg  | Format::DirEqu => FormatFamily::Directive,

      Format::Comment | Format::Unknown | Format::Empty
      | Format::NoOperation | Format::NoOperand => FormatFamily::Marker,
    }
  }

  /// Whether statements of this format are machine instructions.
  pub fn is_instruction(&self) -> bool {
    match self.family() {
      FormatFamily::Primitive | FormatFamily::Indexed | FormatFamily::Expanded => true,
      _ => false
    }
  }

  /// The operands written in assembly language, in order.
  pub fn operands(&self) -> &'static [OperandKind] {
    match self {
      Format::Rrr      => &[Register, Register, Register],
      Format::Rr       => &[Register, Register],
      Format::Rx       => &[Register, Address],
      Format::Kx       => &[Constant, Address],
      Format::Jx       => &[Address],
      Format::Exp0     => &[],
      Format::RrExp    => &[Register, Register],
      Format::RrrExp   => &[Register, Register, Register],
      Format::RrkExp   => &[Register, Register, Constant],
      Format::RkkExp   => &[Register, Constant, Constant],
      Format::RrrkExp  => &[Register, Register, Register, Constant],
      Format::RrkkExp  => &[Register, Register, Constant, Constant],
      Format::RrrkkExp => &[Register, Register, Register, Constant, Constant],
      Format::RrxExp   => &[Register, Register, Address],
      Format::RcExp    => &[Register, ControlRegister],
      Format::Data     => &[Value],
      Format::DirImport => &[Identifier, Identifier],
      Format::DirExport => &[Identifier],
      Format::DirOrg | Format::DirEqu => &[Value],
      Format::DirModule
      | Format::Comment | Format::Unknown | Format::Empty
      | Format::NoOperation | Format::NoOperand => &[],
    }
  }
}

/// `Format::word_count` for a raw format code. Codes outside the enumeration give 0.
pub fn word_count_of_code(code: u8) -> u32 {
  match Format::from_code(code) {
    Some(format) => format.word_count(),
    None => {
      #[cfg(feature = "trace_lookups")]
      log::trace!("word count requested for unknown format code {}", code);
      0
    }
  }
}

/// `Format::name` for a raw format code. Codes outside the enumeration give `"UNKNOWN"`.
pub fn display_name_of_code(code: u8) -> &'static str {
  match Format::from_code(code) {
    Some(format) => format.name(),
    None => {
      #[cfg(feature = "trace_lookups")]
      log::trace!("display name requested for unknown format code {}", code);
      UNKNOWN_LABEL
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use strum::IntoEnumIterator;

  #[test]
  fn codes_are_dense(){
    for (i, format) in Format::iter().enumerate() {
      assert_eq!(format.code() as usize, i);
      assert_eq!(Format::from_code(i as u8), Some(format));
    }
    assert_eq!(Format::iter().count(), MAX_FORMAT_CODE as usize + 1);
  }

  #[test]
  fn word_counts(){
    assert_eq!(Format::Rrr.word_count(), 1);
    assert_eq!(Format::Rr.word_count(), 1);
    assert_eq!(Format::Exp0.word_count(), 1);
    assert_eq!(Format::Data.word_count(), 1);
    assert_eq!(Format::Rx.word_count(), 2);
    assert_eq!(Format::Jx.word_count(), 2);
    assert_eq!(Format::RcExp.word_count(), 2);
    assert_eq!(Format::DirEqu.word_count(), 0);
    assert_eq!(Format::Comment.word_count(), 0);
    assert_eq!(Format::NoOperand.word_count(), 0);
  }

  #[test]
  fn families_agree_with_word_counts(){
    for format in Format::iter() {
      match format.family() {
        FormatFamily::Indexed => assert_eq!(format.word_count(), 2),
        FormatFamily::Primitive | FormatFamily::Data => assert_eq!(format.word_count(), 1),
        FormatFamily::Directive | FormatFamily::Marker => assert_eq!(format.word_count(), 0),
        FormatFamily::Expanded => assert!(format.word_count() >= 1),
      }
    }
  }

  #[test]
  fn out_of_range_codes_degrade(){
    assert_eq!(Format::from_code(MAX_FORMAT_CODE + 1), None);
    assert_eq!(word_count_of_code(MAX_FORMAT_CODE + 1), 0);
    assert_eq!(word_count_of_code(255), 0);
    assert_eq!(display_name_of_code(200), "UNKNOWN");
    assert_eq!(display_name_of_code(0), "RRR");
    assert_eq!(word_count_of_code(2), 2);
  }

  #[test]
  fn labels_round_trip(){
    for format in Format::iter() {
      assert_eq!(Format::from_label(format.name()), Some(format));
      assert_eq!(format.to_string(), format.name());
    }
    assert_eq!(Format::from_label("RRRKKEXP"), Some(Format::RrrkkExp));
    assert_eq!(Format::from_label("rrr"), None);
  }

  #[test]
  fn operand_shapes(){
    assert_eq!(Format::Jx.operands(), &[OperandKind::Address]);
    assert_eq!(Format::RcExp.operands(), &[OperandKind::Register, OperandKind::ControlRegister]);
    assert!(Format::Exp0.operands().is_empty());
    assert_eq!(Format::RrrkkExp.operands().len(), 5);
  }
}
