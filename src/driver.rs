//! The file-driven batch run. The input holds two lines of whitespace separated integers: keys
//! to insert, then keys to remove. The tree is verified after every step and rendered to the
//! output once after each phase.
//!
//! # Examples
//!
//! ```
//! use sequoia::{driver::Batch, Tree};
//!
//! let batch = Batch::parse("5 3 8\n5\n");
//! let mut tree = Tree::new();
//! let mut out = Vec::new();
//! batch.run(&mut tree, &mut out).unwrap();
//!
//! assert_eq!(String::from_utf8(out).unwrap(), "(8 L:(5 L:(3)))\n(8 L:(3))\n");
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use log::{debug, info, warn};
use thiserror::Error;

use crate::Tree;

/// Where a batch run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The two-line file of keys to insert and remove.
    pub input: PathBuf,
    /// Where the two renderings are written. Created or truncated.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.txt"),
            output: PathBuf::from("output.txt"),
        }
    }
}

/// Everything that can stop a batch run.
#[derive(Debug, Error)]
pub enum Error {
    /// An input or output file could not be opened. Nothing has been done to the tree.
    #[error("Error opening {}", path.display())]
    ResourceUnavailable {
        /// The file that couldn't be opened.
        path: PathBuf,
        /// Why.
        source: io::Error,
    },
    /// The tree failed verification right after `value` was inserted.
    #[error("Sequoia invalid after adding {value}:  {tree}")]
    InvalidAfterInsert {
        /// The key just inserted.
        value: i64,
        /// The rendering of the offending tree.
        tree: String,
    },
    /// The tree failed verification right after `value` was removed.
    #[error("Sequoia invalid after removing {value}:  {tree}")]
    InvalidAfterRemove {
        /// The key just removed.
        value: i64,
        /// The rendering of the offending tree.
        tree: String,
    },
    /// Writing a rendering to the output failed.
    #[error("Failed to write the tree")]
    Write(#[from] io::Error),
}

/// The keys to insert and then remove, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Keys from the first line.
    pub inserts: Vec<i64>,
    /// Keys from the second line.
    pub removes: Vec<i64>,
}

impl Batch {
    /// Reads the inserts from the first line of `input` and the removes from the second. A
    /// missing line is an empty list and anything after the second line is ignored. Each line
    /// is read up to its first token that isn't an integer.
    pub fn parse(input: &str) -> Self {
        let mut lines = input.lines();
        Self {
            inserts: parse_line(lines.next().unwrap_or_default(), 1),
            removes: parse_line(lines.next().unwrap_or_default(), 2),
        }
    }

    /// Inserts then removes every key in order, checking [`Tree::is_verified`] after each
    /// step. The tree's rendering is written to `out` after each phase, one line each.
    ///
    /// The first failed check stops the run. Removing a key the tree doesn't hold does nothing.
    pub fn run<W: Write>(&self, tree: &mut Tree, mut out: W) -> Result<(), Error> {
        for &value in &self.inserts {
            tree.insert(value);
            if !tree.is_verified() {
                return Err(Error::InvalidAfterInsert {
                    value,
                    tree: tree.to_string(),
                });
            }
        }
        info!(
            "inserted {} keys, tree height is {}",
            self.inserts.len(),
            tree.height()
        );
        writeln!(out, "{}", tree)?;

        for &value in &self.removes {
            if tree.remove(value).is_none() {
                debug!("{} was not in the tree", value);
            }
            if !tree.is_verified() {
                return Err(Error::InvalidAfterRemove {
                    value,
                    tree: tree.to_string(),
                });
            }
        }
        info!(
            "removed {} keys, {} remain",
            self.removes.len(),
            tree.len()
        );
        writeln!(out, "{}", tree)?;

        out.flush()?;
        Ok(())
    }
}

fn parse_line(line: &str, number: usize) -> Vec<i64> {
    let mut keys = Vec::new();
    for token in line.split_whitespace() {
        match token.parse() {
            Ok(key) => keys.push(key),
            Err(err) => {
                warn!("line {}: stopped reading at {:?}: {}", number, token, err);
                break;
            }
        }
    }
    keys
}

/// Opens both files named by `config`, then runs the batch they describe on a fresh tree. Returns
/// the tree as it was left after the remove phase.
pub fn run(config: &Config) -> Result<Tree, Error> {
    let input = fs::read_to_string(&config.input).map_err(|source| Error::ResourceUnavailable {
        path: config.input.clone(),
        source,
    })?;
    let output = File::create(&config.output).map_err(|source| Error::ResourceUnavailable {
        path: config.output.clone(),
        source,
    })?;

    let batch = Batch::parse(&input);
    debug!(
        "read {} inserts and {} removes from {}",
        batch.inserts.len(),
        batch.removes.len(),
        config.input.display()
    );

    let mut tree = Tree::new();
    batch.run(&mut tree, BufWriter::new(output))?;
    Ok(tree)
}
