/*!
  The instruction-set registry of the Sigma16 architecture: which mnemonics exist, the format
  of each, the opcode fields that select it, and the named bits and control registers that
  systems code refers to.

  The assembler's code generator looks a mnemonic up to learn its format and opcode fields,
  and asks the format how many words to emit. The emulator's decoder goes the other way
  through `opcode_index()`. Both consult the same tables, which are built once on first use
  and never change afterwards, so any number of threads may read them at once.

  Nothing in this crate fails. An unknown mnemonic, format code, or control register name is
  reported as `None` (or a harmless default), and it is up to the caller to turn that into a
  diagnostic for the offending source line.
*/

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate prettytable;

pub mod bits;
pub mod ctlreg;
pub mod encoding;
pub mod format;
pub mod listing;
pub mod mnemonic;
pub mod validate;

pub use bits::{ConditionBit, InterruptBit, StatusBit};
pub use ctlreg::ControlRegisterTable;
pub use encoding::{OpcodeIndex, Word};
pub use format::{Format, FormatFamily, OperandKind};
pub use mnemonic::{EntryKind, MnemonicEntry, MnemonicTable};
pub use validate::RegistryError;

lazy_static! {
  static ref MNEMONICS: MnemonicTable = {
    let table = MnemonicTable::new();
    log::debug!("mnemonic table initialized with {} entries", table.len());
    table
  };

  static ref CONTROL_REGISTERS: ControlRegisterTable = {
    let table = ControlRegisterTable::new();
    log::debug!("control register table initialized with {} entries", table.len());
    table
  };

  static ref OPCODE_INDEX: OpcodeIndex<'static> = OpcodeIndex::new(&MNEMONICS);
}

// region Registry access

pub fn mnemonics() -> &'static MnemonicTable {
  &MNEMONICS
}

pub fn control_registers() -> &'static ControlRegisterTable {
  &CONTROL_REGISTERS
}

pub fn opcode_index() -> &'static OpcodeIndex<'static> {
  &OPCODE_INDEX
}

// endregion

// region Lookups

pub fn lookup(mnemonic: &str) -> Option<&'static MnemonicEntry> {
  MNEMONICS.lookup(mnemonic)
}

pub fn format_of(mnemonic: &str) -> Option<Format> {
  lookup(mnemonic).map(|entry| entry.format)
}

pub fn opcode_fields_of(mnemonic: &str) -> Option<&'static [u8]> {
  lookup(mnemonic).map(|entry| entry.opcode)
}

/// False for an unknown mnemonic as well; check `lookup` if the difference matters.
pub fn is_pseudo(mnemonic: &str) -> bool {
  lookup(mnemonic).map_or(false, |entry| entry.pseudo)
}

pub fn word_count(format: Format) -> u32 {
  format.word_count()
}

pub fn display_name(format: Format) -> &'static str {
  format.name()
}

pub use format::{display_name_of_code, word_count_of_code};

pub fn control_register_index(name: &str) -> Option<u8> {
  CONTROL_REGISTERS.index(name)
}

pub fn control_register_name(index: u8) -> Option<&'static str> {
  CONTROL_REGISTERS.name(index)
}

// endregion

/// Checks every invariant of the registry. See `validate`.
pub fn validate() -> Result<(), Vec<RegistryError>> {
  validate::validate(&MNEMONICS, &CONTROL_REGISTERS)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn external_interface(){
    assert_eq!(format_of("add"), Some(Format::Rrr));
    assert_eq!(opcode_fields_of("add"), Some(&[0u8][..]));
    assert_eq!(format_of("load"), Some(Format::Rx));
    assert_eq!(opcode_fields_of("load"), Some(&[15u8, 1][..]));
    assert_eq!(format_of("jumpeq"), Some(Format::Jx));
    assert_eq!(opcode_fields_of("jumpeq"), Some(&[15u8, 5, 2][..]));
    assert!(is_pseudo("and"));
    assert_eq!(opcode_fields_of("and"), Some(&[14u8, 22, 1][..]));
    assert_eq!(control_register_index("mask"), Some(1));
    assert_eq!(word_count(Format::Rrr), 1);
    assert_eq!(word_count(Format::Rx), 2);
    assert_eq!(display_name(Format::RcExp), "RCEXP");
  }

  #[test]
  fn absent_keys(){
    assert_eq!(format_of("mov"), None);
    assert_eq!(opcode_fields_of("mov"), None);
    assert!(!is_pseudo("mov"));
    assert!(!is_pseudo("add"));
    assert_eq!(control_register_index("pc"), None);
    assert_eq!(control_register_name(4), Some("ipc"));
  }

  #[test]
  fn registry_is_valid(){
    assert_eq!(validate(), Ok(()));
  }
}
