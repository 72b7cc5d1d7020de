use std::hash::Hasher;
use std::path::{Component, Path};

use clap::ValueEnum;
use derive_more::Display;
use metrohash::MetroHash64;

const NODE_PREFIX: &str = "node_";
const PERMISSION_DENIED_SUFFIX: &str = "_perm";

/// Identifier of a node in the flowchart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct NodeId(String);

impl NodeId {
    /// `node_` followed by `name` with every `/` and `.` replaced by `_`.
    pub fn from_name(name: &str) -> Self {
        Self(format!("{NODE_PREFIX}{}", sanitize(name)))
    }

    /// Like [`NodeId::from_name`], suffixed with a hash of the directory's
    /// location below the scan root so equal names never share an id.
    pub fn from_location(name: &str, relative: &Path) -> Self {
        Self(format!(
            "{NODE_PREFIX}{}_{:016x}",
            sanitize(name),
            location_hash(relative)
        ))
    }

    /// Id of the leaf rendered when this node's directory cannot be listed.
    pub fn permission_denied(&self) -> Self {
        Self(format!("{}{PERMISSION_DENIED_SUFFIX}", self.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn sanitize(name: &str) -> String {
    name.replace(['/', '.'], "_")
}

// Hashes the `/`-joined normal components so the id does not depend on the
// platform separator.
fn location_hash(relative: &Path) -> u64 {
    let mut hasher = MetroHash64::default();
    let mut first = true;
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !first {
                hasher.write(b"/");
            }
            hasher.write(part.as_encoded_bytes());
            first = false;
        }
    }
    hasher.finish()
}

/// How node ids are derived from directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IdScheme {
    /// Base name only; directories sharing a name share a node.
    #[default]
    Name,
    /// Base name plus a hash of the path relative to the scan root.
    Path,
}

impl IdScheme {
    pub fn node_id(self, name: &str, relative: &Path) -> NodeId {
        match self {
            IdScheme::Name => NodeId::from_name(name),
            IdScheme::Path => NodeId::from_location(name, relative),
        }
    }
}
