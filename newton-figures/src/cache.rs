use std::collections::HashMap;
use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter, Result};
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::utils::{error, GIF_EXT, RON_EXT};

const FILENAME: &str = "cache";

const HEADER: &str = "name md5(ron) md5(gif)";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    ron_hash: String,
    gif_hash: String,
}

impl CacheEntry {
    fn hash(dirname: &str, name: &str) -> Result<Option<Self>> {
        let ron_path = file_path(dirname, name, RON_EXT);
        let gif_path = file_path(dirname, name, GIF_EXT);
        if !ron_path.exists() || !gif_path.exists() {
            return Ok(None);
        }
        Ok(Some(Self {
            ron_hash: md5_of(&ron_path)?,
            gif_hash: md5_of(&gif_path)?,
        }))
    }

    fn parse(line: &str) -> Result<(String, Self)> {
        let Some((name, ron_hash, gif_hash)) = line.split_whitespace().collect_tuple() else {
            return Err(error(&format!("Malformed cache line ({line})")));
        };
        Ok((
            name.to_owned(),
            Self {
                ron_hash: ron_hash.to_owned(),
                gif_hash: gif_hash.to_owned(),
            },
        ))
    }
}

/// md5 hashes of each figure's sidecar and GIF from the previous run.
#[derive(Debug)]
pub struct Cache {
    entries: HashMap<String, CacheEntry>,
    dirname: String,
}

fn file_path(dirname: &str, filename: &str, ext: &str) -> PathBuf {
    let mut path = PathBuf::from(dirname).join(filename);
    path.set_extension(ext);
    path
}

fn md5_of(path: &Path) -> Result<String> {
    Ok(format!("{:x}", md5::compute(std::fs::read(path)?)))
}

impl Cache {
    pub fn new(dirname: &str) -> Self {
        Self {
            entries: HashMap::new(),
            dirname: dirname.to_owned(),
        }
    }

    pub fn load(dirname: &str) -> Result<Self> {
        let path = PathBuf::from(dirname).join(FILENAME);
        if !path.exists() {
            return Ok(Self::new(dirname));
        }

        let mut lines = BufReader::new(File::open(path)?).lines();
        match lines.next().transpose()? {
            Some(header) if header == HEADER => {}
            header => {
                return Err(error(&format!(
                    "Unexpected header ({})",
                    header.unwrap_or_default()
                )))
            }
        }

        let entries = lines
            .filter_ok(|line| !line.trim().is_empty())
            .map(|line| CacheEntry::parse(&line?))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            entries,
            dirname: dirname.to_owned(),
        })
    }

    /// Whether the figure's sidecar and GIF are unchanged since the last save.
    pub fn check(&self, name: &str) -> Result<bool> {
        let Some(entry) = self.entries.get(name) else {
            return Ok(false);
        };
        Ok(CacheEntry::hash(&self.dirname, name)?.as_ref() == Some(entry))
    }

    pub fn update(&mut self, name: &str) -> Result<()> {
        match CacheEntry::hash(&self.dirname, name)? {
            Some(entry) => {
                self.entries.insert(name.to_owned(), entry);
            }
            None => {
                log::warn!("[{name}]: Output missing from {}, dropping cache entry", self.dirname);
                self.entries.remove(name);
            }
        }
        Ok(())
    }

    pub fn save(self) -> Result<()> {
        let path = PathBuf::from(&self.dirname).join(FILENAME);
        let mut writer = BufWriter::new(File::create(path)?);

        writeln!(writer, "{HEADER}")?;
        for (name, entry) in self.entries.iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
            writeln!(writer, "{name} {} {}", entry.ron_hash, entry.gif_hash)?;
        }

        writer.flush()
    }
}
