//! JSON persistence of hypergraphs.
//!
//! Only nodes, hyperedges and the insertion mode are stored; lookup indices are rebuilt (and
//! the stored ids validated) on load.
use super::{Hyperedge, Hypergraph, InsertMode};
use crate::error::Result;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;
use std::hash::Hash;
use std::io::{Read, Write};

#[derive(Serialize)]
struct HypergraphRef<'a, K, L, W> {
    mode: InsertMode,
    nodes: Vec<(&'a K, &'a W)>,
    hyperedges: Vec<(&'a Hyperedge, &'a L)>,
}

#[derive(Deserialize)]
struct HypergraphData<K, L, W> {
    mode: InsertMode,
    nodes: Vec<(K, W)>,
    hyperedges: Vec<(Hyperedge, L)>,
}

impl<K: Serialize, L: Serialize, W: Serialize> Serialize for Hypergraph<K, L, W> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        HypergraphRef {
            mode: self.mode,
            nodes: self.keys.iter().zip(self.weights.iter()).collect(),
            hyperedges: self.adjacency.iter().zip(self.labels.iter()).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, K, L, W> Deserialize<'de> for Hypergraph<K, L, W>
where
    K: Deserialize<'de> + Clone + Eq + Hash + Debug,
    L: Deserialize<'de>,
    W: Deserialize<'de> + Copy,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let data = HypergraphData::deserialize(deserializer)?;
        Hypergraph::from_parts(data.mode, data.nodes, data.hyperedges)
            .map_err(serde::de::Error::custom)
    }
}

/// Write `hypergraph` as JSON and flush `writer`.
pub fn to_writer<K, L, W>(mut writer: impl Write, hypergraph: &Hypergraph<K, L, W>) -> Result<()>
where
    K: Serialize,
    L: Serialize,
    W: Serialize,
{
    serde_json::to_writer(&mut writer, hypergraph)?;
    writer.flush()?;
    Ok(())
}

/// Read a hypergraph written by [`to_writer`].
pub fn from_reader<K, L, W>(reader: impl Read) -> Result<Hypergraph<K, L, W>>
where
    K: DeserializeOwned + Clone + Eq + Hash + Debug,
    L: DeserializeOwned,
    W: DeserializeOwned + Copy,
{
    Ok(serde_json::from_reader(reader)?)
}

/// Write `hypergraph` to the file at `path`.
pub fn save<K, L, W>(
    path: impl AsRef<std::path::Path>,
    hypergraph: &Hypergraph<K, L, W>,
) -> Result<()>
where
    K: Serialize,
    L: Serialize,
    W: Serialize,
{
    let file = std::fs::File::create(path)?;
    // flushed by `to_writer`, so a failed final write is reported rather than lost on drop
    to_writer(std::io::BufWriter::new(file), hypergraph)
}

/// Read a hypergraph from the file at `path`.
pub fn load<K, L, W>(path: impl AsRef<std::path::Path>) -> Result<Hypergraph<K, L, W>>
where
    K: DeserializeOwned + Clone + Eq + Hash + Debug,
    L: DeserializeOwned,
    W: DeserializeOwned + Copy,
{
    let file = std::fs::File::open(path)?;
    from_reader(std::io::BufReader::new(file))
}
