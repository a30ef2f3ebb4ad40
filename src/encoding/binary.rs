/*!
  This module is responsible for packing opcode fields into the first word of an
  instruction and for taking them apart again.
*/

use crate::format::FormatFamily;
use crate::mnemonic::MnemonicEntry;
use super::{ESCAPE_EXP, ESCAPE_RX, FIRST_TWO_WORD_EXP};

// If you change this you must also change `opcode_word` and `decode_opcode_fields`.
pub type Word = u16;

const OP_SHIFT : Word = 12;
const D_SHIFT  : Word = 8;

fn op_field(word: Word) -> u8 {
  (word >> OP_SHIFT) as u8
}

fn d_field(word: Word) -> u8 {
  ((word >> D_SHIFT) & 0xF) as u8
}

fn b_field(word: Word) -> u8 {
  (word & 0xF) as u8
}

fn ab_field(word: Word) -> u8 {
  (word & 0xFF) as u8
}

/**
  Packs the opcode fields of `entry` into a first word with every operand field zero.

  The tertiary field of an RX instruction (the condition code bit of `jumpeq`, the fixed
  `d` of `jump`) lives in `d` and is packed. The tertiary field of an EXP pseudo-instruction
  lives in the second word and is left to the code generator. Returns `None` for statements
  that generate no instruction, and for an opcode field too wide for its slot.
*/
pub fn opcode_word(entry: &MnemonicEntry) -> Option<Word> {
  let op = entry.primary()?;

  match entry.format.family() {

    FormatFamily::Primitive if op < ESCAPE_EXP => {
      Some((op as Word) << OP_SHIFT)
    }

    FormatFamily::Indexed if op == ESCAPE_RX => {
      let b = entry.secondary()?;
      let d = entry.tertiary().unwrap_or(0);
      match b <= 0xF && d <= 0xF {
        true  => Some(((op as Word) << OP_SHIFT) | ((d as Word) << D_SHIFT) | b as Word),
        false => None
      }
    }

    FormatFamily::Expanded if op == ESCAPE_EXP => {
      let ab = entry.secondary()?;
      Some(((op as Word) << OP_SHIFT) | ab as Word)
    }

    _ => None
  }
}

/**
  Extracts the opcode fields that select an operation from the first word of an
  instruction: `[op]` for RRR, `[14, ab]` for EXP, `[15, b]` for RX. Every word decodes to
  something; whether that sequence names an operation is up to `OpcodeIndex`.
*/
pub fn decode_opcode_fields(word: Word) -> Vec<u8> {
  match op_field(word) {
    op if op == ESCAPE_EXP => vec![op, ab_field(word)],
    op if op == ESCAPE_RX  => vec![op, b_field(word)],
    op                     => vec![op],
  }
}

/// The `d` field of a first word, where an RX pseudo-instruction keeps its tertiary field.
pub fn rx_tertiary(word: Word) -> u8 {
  d_field(word)
}

/**
  Given the first word of an instruction, determines whether the entire instruction is two
  words. This is how to determine if a second word needs to be fetched for decoding.

  Note that this function does not check if the word holds a valid opcode.
*/
pub fn is_double_word_instruction(word: Word) -> bool {
  match op_field(word) {
    op if op == ESCAPE_RX  => true,
    op if op == ESCAPE_EXP => ab_field(word) >= FIRST_TWO_WORD_EXP,
    _                      => false
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::mnemonic::MnemonicTable;

  #[test]
  fn pack_primitive(){
    let table = MnemonicTable::new();
    assert_eq!(opcode_word(table.lookup("add").unwrap()), Some(0x0000));
    assert_eq!(opcode_word(table.lookup("trap").unwrap()), Some(0xd000));
  }

  #[test]
  fn pack_indexed(){
    let table = MnemonicTable::new();
    assert_eq!(opcode_word(table.lookup("load").unwrap()), Some(0xf001));
    assert_eq!(opcode_word(table.lookup("jump").unwrap()), Some(0xf003));
    assert_eq!(opcode_word(table.lookup("jumpeq").unwrap()), Some(0xf205));
    assert_eq!(opcode_word(table.lookup("jumpnco").unwrap()), Some(0xf704));
  }

  #[test]
  fn pack_expanded(){
    let table = MnemonicTable::new();
    assert_eq!(opcode_word(table.lookup("rfi").unwrap()), Some(0xe000));
    assert_eq!(opcode_word(table.lookup("logicb").unwrap()), Some(0xe017));
    // The logic function of `and` is not part of the first word.
    assert_eq!(opcode_word(table.lookup("and").unwrap()), Some(0xe016));
  }

  #[test]
  fn directives_do_not_pack(){
    let table = MnemonicTable::new();
    assert_eq!(opcode_word(table.lookup("data").unwrap()), None);
    assert_eq!(opcode_word(table.lookup("org").unwrap()), None);
    assert_eq!(opcode_word(table.lookup("").unwrap()), None);
  }

  #[test]
  fn fields_of_words(){
    assert_eq!(decode_opcode_fields(0x0123), vec![0]);
    assert_eq!(decode_opcode_fields(0xd000), vec![13]);
    assert_eq!(decode_opcode_fields(0xf2a5), vec![15, 5]);
    assert_eq!(decode_opcode_fields(0xe316), vec![14, 0x16]);
    assert_eq!(rx_tertiary(0xf2a5), 2);
  }

  #[test]
  fn instruction_sizes(){
    assert!(!is_double_word_instruction(0x1234));
    assert!(is_double_word_instruction(0xf001));
    assert!(!is_double_word_instruction(0xe000));
    assert!(is_double_word_instruction(0xe008));
    assert!(is_double_word_instruction(0xe117));
  }
}
