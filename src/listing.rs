//! Tables of the registry for people: formats, mnemonics, control registers, and bits.

use prettytable::{format as TableFormat, Table};
use strum::IntoEnumIterator;

use crate::bits::{ConditionBit, InterruptBit, StatusBit};
use crate::ctlreg::ControlRegisterTable;
use crate::encoding::opcode_word;
use crate::format::Format;
use crate::mnemonic::{MnemonicEntry, MnemonicTable};

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

fn new_table() -> Table {
  let mut table = Table::new();
  table.set_format(*TABLE_DISPLAY_FORMAT);
  table
}

fn fields_text(opcode: &[u8]) -> String {
  opcode.iter().map(u8::to_string).collect::<Vec<String>>().join(",")
}

pub fn format_table() -> Table {
  let mut table = new_table();
  table.set_titles(row![ubr->"Code", ubl->"Format", ubr->"Words", ubl->"Family", ubl->"Operands"]);

  for format in Format::iter() {
    let operands =
      format.operands().iter().map(|k| k.to_string()).collect::<Vec<String>>().join(", ");
    table.add_row(
      row![r->format.code(), format.name(), r->format.word_count(), format.family(), operands]
    );
  }
  table
}

/// One row per entry, in declaration order. The word column is the packed first word.
pub fn mnemonic_table(mnemonics: &MnemonicTable) -> Table {
  let mut table = new_table();
  table.set_titles(
    row![ubl->"Mnemonic", ubl->"Format", ubl->"Opcode", ubr->"Word", ubl->"Kind", ubl->"Base"]
  );

  for entry in mnemonics.entries() {
    table.add_row(mnemonic_row(mnemonics, entry));
  }
  table
}

fn mnemonic_row(mnemonics: &MnemonicTable, entry: &MnemonicEntry) -> prettytable::Row {
  let word = match opcode_word(entry) {
    Some(word) => format!("{:04x}", word),
    None       => String::new()
  };
  let base = match mnemonics.base_of(entry) {
    Some(base) => base.mnemonic.to_string(),
    None       => String::new()
  };
  let name = match entry.mnemonic.is_empty() {
    true  => "(empty)".to_string(),
    false => entry.mnemonic.to_string()
  };

  row![name, entry.format, fields_text(entry.opcode), r->word, entry.kind(), base]
}

pub fn control_register_table(registers: &ControlRegisterTable) -> Table {
  let mut table = new_table();
  table.set_titles(row![ubl->"Register", ubr->"Index"]);
  for (name, index) in registers.entries() {
    table.add_row(row![name, r->index]);
  }
  table
}

/**
  The three bit namespaces side by side. Masks are computed with each namespace's own
  numbering, so the same index shows different masks.
*/
pub fn bit_table() -> Table {
  let mut cc = new_table();
  cc.set_titles(row![ubl->"Flag", ubr->"Bit", ubr->"Mask", ubl->"Meaning"]);
  for bit in ConditionBit::iter() {
    cc.add_row(row![bit.letter(), r->bit.index(), r->format!("${:04x}", bit.mask()), bit.meaning()]);
  }

  let mut status = new_table();
  status.set_titles(row![ubl->"Flag", ubr->"Bit", ubr->"Mask"]);
  for bit in StatusBit::iter() {
    status.add_row(row![bit.name(), r->bit.index(), r->format!("${:04x}", bit.mask())]);
  }

  let mut interrupt = new_table();
  interrupt.set_titles(row![ubl->"Flag", ubr->"Bit", ubr->"Mask"]);
  for bit in InterruptBit::iter() {
    interrupt.add_row(row![bit.name(), r->bit.index(), r->format!("${:04x}", bit.mask())]);
  }

  let mut combined_table = table!([cc, status, interrupt]);
  combined_table.set_titles(
    row![ub->"Condition code (bit 0 rightmost)", ub->"Status (bit 0 leftmost)", ub->"Interrupt (bit 0 leftmost)"]
  );
  combined_table.set_format(*TABLE_DISPLAY_FORMAT);
  combined_table
}
