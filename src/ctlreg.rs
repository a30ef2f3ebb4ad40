use bimap::BiMap;
use string_cache::DefaultAtom;

/**
  The control registers are addressed by the `getctl` and `putctl` instructions through a
  numeric field. This table is the mapping between the names used in assembly language and
  that index. It is really just a convenience wrapper around a BiMap, so the decoder can go
  from index back to name. Name lookups compare against the stored names rather than
  interning the caller's text, so reading the table takes no lock.

  Names are matched exactly: `psegBeg` is a control register, `psegbeg` is not.
*/
pub struct ControlRegisterTable {
  table: BiMap<DefaultAtom, u8>
}

/// The canonical control registers, in index order.
pub const CONTROL_REGISTERS: [&str; 10] = [
  "status",   // 0
  "mask",     // 1  interrupt mask
  "req",      // 2  interrupt request
  "istat",    // 3  status saved by an interrupt
  "ipc",      // 4  pc saved by an interrupt
  "vect",     // 5  interrupt vector base
  "psegBeg",  // 6  program segment bounds
  "psegEnd",  // 7
  "dsegBeg",  // 8  data segment bounds
  "dsegEnd",  // 9
];

impl ControlRegisterTable {

  pub fn new() -> ControlRegisterTable {
    ControlRegisterTable::from_pairs(
      CONTROL_REGISTERS.iter().enumerate().map(|(i, name)| (*name, i as u8))
    )
  }

  /// Builds a table from arbitrary (name, index) pairs. A later pair replaces any earlier
  /// pair sharing its name or its index.
  pub fn from_pairs<'a, I>(pairs: I) -> ControlRegisterTable
    where I: IntoIterator<Item=(&'a str, u8)>
  {
    let mut table = BiMap::new();
    for (name, index) in pairs {
      table.insert(DefaultAtom::from(name), index);
    }
    ControlRegisterTable{ table }
  }

  pub fn index(&self, name: &str) -> Option<u8> {
    let index =
      self.table
        .iter()
        .find(|(atom, _)| &***atom == name)
        .map(|(_, index)| *index);
    #[cfg(feature = "trace_lookups")]
    {
      if index.is_none() {
        log::trace!("unknown control register {:?}", name);
      }
    }
    index
  }

  pub fn name(&self, index: u8) -> Option<&str> {
    self.table.get_by_right(&index).map(|atom| &**atom)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  /// Entries in index order.
  pub fn entries(&self) -> Vec<(&str, u8)> {
    let mut entries: Vec<(&str, u8)> =
      self.table.iter().map(|(name, index)| (&**name, *index)).collect();
    entries.sort_by_key(|(_, index)| *index);
    entries
  }
}

impl Default for ControlRegisterTable {
  fn default() -> Self {
    ControlRegisterTable::new()
  }
}
