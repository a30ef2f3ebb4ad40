/*!
  Named bit positions within 16 bit registers.

  There are three independent namespaces, and they do NOT share a numbering convention:

    Condition code:          bit 0 is the least significant (rightmost) bit.
    Status register:         bit 0 is the most significant (leftmost) bit.
    Interrupt request/mask:  bit 0 is the most significant (leftmost) bit.

  Each namespace therefore has its own `mask()`; never build a mask from an index in one
  namespace using the convention of another.
*/
#![allow(non_upper_case_globals)]

use std::convert::TryFrom;

use strum_macros::{Display as StrumDisplay, EnumIter, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::encoding::Word;

/// Number of bits in a register.
pub const REGISTER_BITS: u8 = 16;

// region Condition code

/**
  Flags in the condition code register R15. The arithmetic and comparison instructions
  may set several of these together. Little endian numbering: index 0 is the rightmost bit.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,       PartialEq,        Debug,        Hash
)]
#[repr(u8)]
pub enum ConditionBit {
  #[strum(to_string = "G")] GreaterBinary     = 0, // >  binary
  #[strum(to_string = "g")] GreaterTwos       = 1, // >  two's complement
  #[strum(to_string = "E")] Equal             = 2, // =  all types
  #[strum(to_string = "l")] LessTwos          = 3, // <  two's complement
  #[strum(to_string = "L")] LessBinary        = 4, // <  binary
  #[strum(to_string = "V")] OverflowBinary    = 5, // overflow, binary
  #[strum(to_string = "v")] OverflowTwos      = 6, // overflow, two's complement
  #[strum(to_string = "C")] Carry             = 7, // carry, binary
}

pub const BIT_CC_G: u8 = ConditionBit::GreaterBinary as u8;
pub const BIT_CC_g: u8 = ConditionBit::GreaterTwos as u8;
pub const BIT_CC_E: u8 = ConditionBit::Equal as u8;
pub const BIT_CC_l: u8 = ConditionBit::LessTwos as u8;
pub const BIT_CC_L: u8 = ConditionBit::LessBinary as u8;
pub const BIT_CC_V: u8 = ConditionBit::OverflowBinary as u8;
pub const BIT_CC_v: u8 = ConditionBit::OverflowTwos as u8;
pub const BIT_CC_C: u8 = ConditionBit::Carry as u8;

impl ConditionBit {
  pub fn index(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn from_index(index: u8) -> Option<ConditionBit> {
    ConditionBit::try_from(index).ok()
  }

  /// The single-bit mask, counting from the right.
  pub fn mask(&self) -> Word {
    1 << self.index()
  }

  /// The one letter name used in the documentation of the condition code.
  pub fn letter(&self) -> &'static str {
    (*self).into()
  }

  pub fn meaning(&self) -> &'static str {
    match self {
      ConditionBit::GreaterBinary  => "> (binary)",
      ConditionBit::GreaterTwos    => "> (two's complement)",
      ConditionBit::Equal          => "= (all types)",
      ConditionBit::LessTwos       => "< (two's complement)",
      ConditionBit::LessBinary     => "< (binary)",
      ConditionBit::OverflowBinary => "overflow (binary)",
      ConditionBit::OverflowTwos   => "overflow (two's complement)",
      ConditionBit::Carry          => "carry (binary)",
    }
  }
}

// endregion

// region Status register

/**
  Flags in the status control register. Big endian numbering: index 0 is the leftmost bit.

  The machine boots with every register cleared, so the zero value of each flag is the
  boot state: system (supervisor) state with interrupts disabled.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,       PartialEq,        Debug,        Hash
)]
#[repr(u8)]
pub enum StatusBit {
  #[strum(to_string = "userStateBit")] UserState = 0, // 0 = system state, 1 = user state
  #[strum(to_string = "intEnableBit")] IntEnable = 1, // 0 = disabled,     1 = enabled
}

pub const USER_STATE_BIT: u8 = StatusBit::UserState as u8;
pub const INT_ENABLE_BIT: u8 = StatusBit::IntEnable as u8;

impl StatusBit {
  pub fn index(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn from_index(index: u8) -> Option<StatusBit> {
    StatusBit::try_from(index).ok()
  }

  /// The single-bit mask, counting from the left.
  pub fn mask(&self) -> Word {
    0x8000 >> self.index()
  }

  pub fn name(&self) -> &'static str {
    (*self).into()
  }

  pub fn meaning(&self) -> &'static str {
    match self {
      StatusBit::UserState => "0 = system state, 1 = user state",
      StatusBit::IntEnable => "0 = interrupts disabled, 1 = enabled",
    }
  }
}

// endregion

// region Interrupt request and mask

/// Bits shared by the interrupt request and interrupt mask registers. Big endian numbering.
#[derive(
  StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,       PartialEq,        Debug,        Hash
)]
#[repr(u8)]
pub enum InterruptBit {
  #[strum(to_string = "timerBit")]      Timer      = 0,
  #[strum(to_string = "segFaultBit")]   SegFault   = 1,
  #[strum(to_string = "stackFaultBit")] StackFault = 2,
  #[strum(to_string = "userTrapBit")]   UserTrap   = 3,
  #[strum(to_string = "overflowBit")]   Overflow   = 4,
  #[strum(to_string = "zDivBit")]       ZDiv       = 5,
}

pub const TIMER_BIT: u8       = InterruptBit::Timer as u8;
pub const SEG_FAULT_BIT: u8   = InterruptBit::SegFault as u8;
pub const STACK_FAULT_BIT: u8 = InterruptBit::StackFault as u8;
pub const USER_TRAP_BIT: u8   = InterruptBit::UserTrap as u8;
pub const OVERFLOW_BIT: u8    = InterruptBit::Overflow as u8;
pub const ZDIV_BIT: u8        = InterruptBit::ZDiv as u8;

impl InterruptBit {
  pub fn index(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn from_index(index: u8) -> Option<InterruptBit> {
    InterruptBit::try_from(index).ok()
  }

  /// The single-bit mask, counting from the left.
  pub fn mask(&self) -> Word {
    0x8000 >> self.index()
  }

  pub fn name(&self) -> &'static str {
    (*self).into()
  }

  pub fn meaning(&self) -> &'static str {
    match self {
      InterruptBit::Timer      => "timer has gone off",
      InterruptBit::SegFault   => "access to an invalid virtual address",
      InterruptBit::StackFault => "stack overflow or underflow",
      InterruptBit::UserTrap   => "user trap",
      InterruptBit::Overflow   => "overflow occurred",
      InterruptBit::ZDiv       => "division by 0",
    }
  }
}

// endregion


#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;
  use strum::IntoEnumIterator;

  #[test]
  fn condition_bits_count_from_the_right(){
    assert_eq!(ConditionBit::GreaterBinary.mask(), 0x0001);
    assert_eq!(ConditionBit::Equal.mask(), 0x0004);
    assert_eq!(ConditionBit::Carry.mask(), 0x0080);
    assert_eq!(BIT_CC_E, 2);
    assert_eq!(BIT_CC_g, 1);
    assert_eq!(ConditionBit::from_index(3), Some(ConditionBit::LessTwos));
    assert_eq!(ConditionBit::from_index(8), None);
  }

  #[test]
  fn control_bits_count_from_the_left(){
    assert_eq!(StatusBit::UserState.mask(), 0x8000);
    assert_eq!(StatusBit::IntEnable.mask(), 0x4000);
    assert_eq!(InterruptBit::Timer.mask(), 0x8000);
    assert_eq!(InterruptBit::UserTrap.mask(), 0x1000);
    assert_eq!(InterruptBit::ZDiv.mask(), 0x0400);
  }

  #[test]
  fn namespaces_are_unique_and_in_range(){
    let cc: HashSet<u8> = ConditionBit::iter().map(|b| b.index()).collect();
    assert_eq!(cc.len(), 8);
    assert!(cc.iter().all(|i| *i < REGISTER_BITS));

    let status: HashSet<u8> = StatusBit::iter().map(|b| b.index()).collect();
    assert_eq!(status.len(), 2);

    let interrupt: HashSet<u8> = InterruptBit::iter().map(|b| b.index()).collect();
    assert_eq!(interrupt.len(), 6);
    assert!(interrupt.iter().all(|i| *i < REGISTER_BITS));
  }

  #[test]
  fn same_index_different_masks(){
    // Index 0 names a different physical bit in each convention.
    assert_eq!(ConditionBit::GreaterBinary.index(), InterruptBit::Timer.index());
    assert_ne!(ConditionBit::GreaterBinary.mask(), InterruptBit::Timer.mask());
  }
}
