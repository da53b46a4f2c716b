//! Bank files on disk
//!
//! A `BankFile` ties a parsed bank to the path it came from. Changes stay in
//! memory until `close`, which moves the original aside to a numbered backup
//! and writes the new encoding in its place, once.

use crate::config::BankConfig;
use crate::core::Bank;
use crate::error::Result;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// First free backup path for `path`: `<path>.000`, `<path>.001`, ...
pub fn backup_path<P: AsRef<Path>>(path: P, width: usize) -> PathBuf {
    let path = path.as_ref();
    let mut index: u64 = 0;
    loop {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{:0width$}", index, width = width));
        let candidate = PathBuf::from(name);
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}

/// A bank opened from a file, saved back on `close` when dirty
///
/// Derefs to [`Bank`] for listing, extraction and mutation.
///
/// # Examples
///
/// ```rust,no_run
/// use bnk::{BankConfig, BankFile};
///
/// # fn main() -> bnk::Result<()> {
/// let mut file = BankFile::open("Init.bnk", BankConfig::default())?;
/// file.update("123456", std::fs::read("123456.wem")?);
/// if let Some(backup) = file.close()? {
///     println!("original kept at {}", backup.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BankFile {
    path: PathBuf,
    bank: Bank,
    config: BankConfig,
}

impl BankFile {
    pub fn open<P: AsRef<Path>>(path: P, config: BankConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bank = Bank::open_with(&path, config.parse_options())?;
        info!(
            "Opened bank {:?}: version {}, {} items",
            path,
            bank.version(),
            bank.len()
        );
        Ok(BankFile { path, bank, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist pending changes
    ///
    /// Returns the backup path when the bank was dirty and has been rewritten,
    /// `None` when there was nothing to save. The bank is encoded before the
    /// original is touched, so an encoding error leaves the file in place.
    pub fn close(mut self) -> Result<Option<PathBuf>> {
        if !self.bank.is_dirty() {
            debug!("Bank {:?} unchanged, nothing to save", self.path);
            return Ok(None);
        }

        let bytes = self.bank.serialize()?;
        let backup = backup_path(&self.path, self.config.backup_suffix_width);
        std::fs::rename(&self.path, &backup)?;
        info!("Backed up {:?} to {:?}", self.path, backup);

        std::fs::write(&self.path, &bytes)?;
        self.bank.mark_clean();
        info!("Saved {} bytes to {:?}", bytes.len(), self.path);

        Ok(Some(backup))
    }
}

impl Deref for BankFile {
    type Target = Bank;

    fn deref(&self) -> &Bank {
        &self.bank
    }
}

impl DerefMut for BankFile {
    fn deref_mut(&mut self) -> &mut Bank {
        &mut self.bank
    }
}
