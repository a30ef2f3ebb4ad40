//! `sigma16-isa`: prints the instruction-set registry, looks up mnemonics, and decodes words.
//!
//!   sigma16-isa mnemonics
//!   sigma16-isa lookup jumpeq
//!   sigma16-isa decode f205
//!   RUST_LOG=debug sigma16-isa check

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use sigma16_isa::{encoding, listing, Word};

#[derive(Parser, Debug)]
#[command(name = "sigma16-isa", version, about = "Sigma16 instruction-set registry")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Every statement format with its word count and operands
  Formats,
  /// Every mnemonic with its format and opcode fields
  Mnemonics,
  /// The control registers and their indices
  Ctlregs,
  /// Condition code, status, and interrupt bits
  Bits,
  /// Looks up one mnemonic
  Lookup { mnemonic: String },
  /// Decodes the first word of an instruction, given in hex
  Decode { word: String },
  /// Checks the consistency of the registry
  Check,
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  match cli.command {

    Command::Formats => {
      listing::format_table().printstd();
    }

    Command::Mnemonics => {
      listing::mnemonic_table(sigma16_isa::mnemonics()).printstd();
    }

    Command::Ctlregs => {
      listing::control_register_table(sigma16_isa::control_registers()).printstd();
    }

    Command::Bits => {
      listing::bit_table().printstd();
    }

    Command::Lookup { mnemonic } => {
      let entry = sigma16_isa::lookup(&mnemonic)
        .ok_or_else(|| anyhow!("{} is not a mnemonic", mnemonic))?;
      println!("{}", entry);
      println!("words: {}", entry.word_count());
      if let Some(word) = encoding::opcode_word(entry) {
        println!("first word: {:04x}", word);
      }
      if let Some(base) = sigma16_isa::mnemonics().base_of(entry) {
        println!("pseudo-instruction for: {}", base);
      }
    }

    Command::Decode { word } => {
      let digits = word.trim_start_matches("0x").trim_start_matches('$');
      let word = Word::from_str_radix(digits, 16)
        .with_context(|| format!("{} is not a hexadecimal word", word))?;
      let index = sigma16_isa::opcode_index();
      match (index.decode(word), index.decode_alias(word)) {
        (Some(real), Some(alias)) if real != alias => println!("{} ({})", alias, real.mnemonic),
        (Some(real), _) => println!("{}", real),
        (None, _) => bail!("{:04x} does not hold a valid opcode", word),
      }
      let words = match encoding::is_double_word_instruction(word) {
        true  => 2,
        false => 1
      };
      println!("words: {}", words);
    }

    Command::Check => {
      match sigma16_isa::validate() {
        Ok(()) => {
          log::info!("{} mnemonics checked", sigma16_isa::mnemonics().len());
          println!("ok");
        }
        Err(errors) => {
          for error in &errors {
            eprintln!("{}", error);
          }
          bail!("{} inconsistencies in the registry", errors.len());
        }
      }
    }

  }

  Ok(())
}
