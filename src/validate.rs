/*!
  Consistency checks over the whole registry. Nothing here is needed to look anything up;
  these are the invariants the assembler and the emulator rely on when they share the
  tables, checked in one place so that an edit to a table can't silently break them.
*/

use std::collections::{HashMap, HashSet};

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::bits::{ConditionBit, InterruptBit, StatusBit, REGISTER_BITS};
use crate::ctlreg::ControlRegisterTable;
use crate::encoding::{ESCAPE_EXP, ESCAPE_RX, FIRST_TWO_WORD_EXP, MAX_NYBBLE};
use crate::format::FormatFamily;
use crate::mnemonic::{literal_covers, MnemonicEntry, MnemonicTable};

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum RegistryError {
  #[error("`{first}` and `{second}` have the same format and opcode fields")]
  DuplicateEncoding { first: String, second: String },

  #[error("`{mnemonic}` has primary opcode {primary} but format {format}")]
  EscapePartition { mnemonic: String, primary: u8, format: String },

  #[error("pseudo-instruction `{mnemonic}` does not extend any real instruction")]
  OrphanPseudo { mnemonic: String },

  #[error("pseudo-instruction `{mnemonic}` leaves out operands {omitted:?} of `{base}`")]
  OperandShape { mnemonic: String, base: String, omitted: Vec<String> },

  #[error("`{mnemonic}` has format {format} but opcode fields {fields:?}")]
  FieldCount { mnemonic: String, format: String, fields: Vec<u8> },

  #[error("opcode field {value} of `{mnemonic}` does not fit in 4 bits")]
  FieldWidth { mnemonic: String, value: u8 },

  #[error("`{mnemonic}` is a {words} word {format} instruction with secondary opcode {secondary}")]
  ExpandedWidth { mnemonic: String, format: String, words: u32, secondary: u8 },

  #[error("bit {index} of the {namespace} namespace is reused or out of range")]
  BitIndex { namespace: &'static str, index: u8 },

  #[error("control register `{name}` has index {index}")]
  ControlRegister { name: String, index: u8 },
}

/// Runs every check and returns all violations, not just the first.
pub fn validate(table: &MnemonicTable, registers: &ControlRegisterTable)
  -> Result<(), Vec<RegistryError>>
{
  let mut errors = Vec::new();

  check_unique_encodings(table, &mut errors);
  for entry in table.entries() {
    check_shape(entry, &mut errors);
    check_field_widths(entry, &mut errors);
  }
  check_pseudo_instructions(table, &mut errors);
  check_bits(&mut errors);
  check_control_registers(registers, &mut errors);

  match errors.is_empty() {
    true  => Ok(()),
    false => Err(errors)
  }
}

fn check_unique_encodings(table: &MnemonicTable, errors: &mut Vec<RegistryError>) {
  let mut seen: HashMap<(u8, &[u8]), &MnemonicEntry> = HashMap::new();

  for entry in table.entries().iter().filter(|e| e.format.is_instruction()) {
    if let Some(first) = seen.insert((entry.format.code(), entry.opcode), entry) {
      errors.push(RegistryError::DuplicateEncoding {
        first  : first.mnemonic.to_string(),
        second : entry.mnemonic.to_string(),
      });
    }
  }
}

/// The escape-space partition, and the number of opcode fields each family carries.
fn check_shape(entry: &MnemonicEntry, errors: &mut Vec<RegistryError>) {
  let family = entry.format.family();
  let fields = entry.opcode.len();

  let count_ok =
    match family {
      FormatFamily::Primitive => fields == 1,
      FormatFamily::Indexed | FormatFamily::Expanded => fields == 2 || fields == 3,
      FormatFamily::Data | FormatFamily::Directive | FormatFamily::Marker => fields == 0,
    };
  if !count_ok {
    errors.push(RegistryError::FieldCount {
      mnemonic : entry.mnemonic.to_string(),
      format   : entry.format.to_string(),
      fields   : entry.opcode.to_vec(),
    });
    return;
  }

  if let Some(primary) = entry.primary() {
    let partition_ok =
      match family {
        FormatFamily::Primitive => primary < ESCAPE_EXP,
        FormatFamily::Expanded  => primary == ESCAPE_EXP,
        FormatFamily::Indexed   => primary == ESCAPE_RX,
        _ => false
      };
    if !partition_ok {
      errors.push(RegistryError::EscapePartition {
        mnemonic : entry.mnemonic.to_string(),
        primary,
        format   : entry.format.to_string(),
      });
    }
  }

  // One word EXP instructions occupy the low secondary opcodes.
  if let (FormatFamily::Expanded, Some(secondary)) = (family, entry.secondary()) {
    let words = entry.word_count();
    if (secondary < FIRST_TWO_WORD_EXP) != (words == 1) {
      errors.push(RegistryError::ExpandedWidth {
        mnemonic : entry.mnemonic.to_string(),
        format   : entry.format.to_string(),
        words,
        secondary,
      });
    }
  }
}

/// Every field packed into a nybble must fit. The EXP secondary opcode has a whole byte.
fn check_field_widths(entry: &MnemonicEntry, errors: &mut Vec<RegistryError>) {
  let family = entry.format.family();
  for (position, value) in entry.opcode.iter().enumerate() {
    let byte_wide = position == 1 && family == FormatFamily::Expanded;
    if !byte_wide && *value > MAX_NYBBLE {
      errors.push(RegistryError::FieldWidth {
        mnemonic : entry.mnemonic.to_string(),
        value    : *value,
      });
    }
  }
}

/// Each pseudo-instruction needs a base, and the operands it leaves out must be ones its
/// trailing literal and implicit R0 registers can supply.
fn check_pseudo_instructions(table: &MnemonicTable, errors: &mut Vec<RegistryError>) {
  for entry in table.entries().iter().filter(|e| e.pseudo) {
    let base = match table.base_of(entry) {
      Some(base) => base,
      None => {
        errors.push(RegistryError::OrphanPseudo{ mnemonic: entry.mnemonic.to_string() });
        continue;
      }
    };

    let omitted = table.omitted_operands(entry).unwrap_or_default();
    if !literal_covers(&omitted) {
      errors.push(RegistryError::OperandShape {
        mnemonic : entry.mnemonic.to_string(),
        base     : base.mnemonic.to_string(),
        omitted  : omitted.iter().map(|k| k.to_string()).collect(),
      });
    }
  }
}

fn check_namespace<I>(namespace: &'static str, indices: I, errors: &mut Vec<RegistryError>)
  where I: Iterator<Item=u8>
{
  let mut seen = HashSet::new();
  for index in indices {
    if index >= REGISTER_BITS || !seen.insert(index) {
      errors.push(RegistryError::BitIndex{ namespace, index });
    }
  }
}

fn check_bits(errors: &mut Vec<RegistryError>) {
  check_namespace("condition code", ConditionBit::iter().map(|b| b.index()), errors);
  check_namespace("status", StatusBit::iter().map(|b| b.index()), errors);
  check_namespace("interrupt", InterruptBit::iter().map(|b| b.index()), errors);
}

/// Indices must be exactly 0..n, one per register.
fn check_control_registers(registers: &ControlRegisterTable, errors: &mut Vec<RegistryError>) {
  for (expected, (name, index)) in registers.entries().into_iter().enumerate() {
    if index as usize != expected {
      errors.push(RegistryError::ControlRegister{ name: name.to_string(), index });
    }
  }
}
