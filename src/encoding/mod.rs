/*!

  The machine uses a 16 bit word. Instructions are either one or two words. The first word
  of every instruction is divided into four 4 bit fields:

    [op:4][d:4][a:4][b:4]

  `op` is the primary opcode. Values 0-13 are RRR instructions, whose operands are the
  registers `d`, `a`, and `b`. The remaining two values are escapes:

    op = 14   EXP: the low byte `ab` holds the secondary opcode. Secondary opcodes 0-7 are
              one word instructions; 8 and above have a second word of operand fields.
    op = 15   RX:  `b` holds the secondary opcode, `a` the index register, and `d` the
              destination register or a constant. The second word is the displacement.

  This module packs the opcode fields of a mnemonic into a first word and, in the other
  direction, recovers the mnemonic from a first word. Packing operands is the business of
  the code generator; every operand field of a word produced here is zero.

*/

mod binary;
mod index;

pub use binary::{opcode_word, decode_opcode_fields, rx_tertiary, is_double_word_instruction, Word};
pub use index::OpcodeIndex;

/// Primary opcode escaping to the expanded instruction space.
pub const ESCAPE_EXP: u8 = 14;
/// Primary opcode escaping to the indexed (RX) instruction space.
pub const ESCAPE_RX: u8 = 15;

/// Largest value of a 4 bit field (`op`, `d`, `a`, `b`).
pub const MAX_NYBBLE: u8 = 0xF;
/// EXP secondary opcodes below this are one word instructions.
pub const FIRST_TWO_WORD_EXP: u8 = 8;
