//! Snapshot save files.
//!
//! Three on-disk forms are supported, picked by extension:
//! `.json` (pretty JSON), `.json.gz` / `.gz` (gzip JSON) and `.rkyv`
//! (validated zero-copy archive).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rkyv::de::deserializers::SharedDeserializeMap;
use rkyv::ser::serializers::AllocSerializer;
use rkyv::ser::Serializer;
use rkyv::{Archive, Deserialize, Serialize};
use runoff_data::SimSnapshot;

use crate::error::{IoError, Result};
use crate::serialization::{from_json, to_json, to_json_pretty};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    JsonGz,
    Rkyv,
}

impl SaveFormat {
    /// Picks the format from a file name, defaulting to JSON.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("gz") => SaveFormat::JsonGz,
            Some("rkyv") => SaveFormat::Rkyv,
            _ => SaveFormat::Json,
        }
    }
}

fn validated(snapshot: SimSnapshot) -> Result<SimSnapshot> {
    snapshot
        .check_lengths()
        .map_err(|e| IoError::validation(e.to_string()))?;
    Ok(snapshot)
}

fn write_json(snapshot: &SimSnapshot, path: &Path, compress: bool) -> Result<()> {
    if compress {
        let file = File::create(path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(to_json(snapshot)?.as_bytes())?;
        encoder
            .finish()
            .map_err(|e| IoError::compression(e.to_string()))?;
    } else {
        std::fs::write(path, to_json_pretty(snapshot)?)?;
    }
    Ok(())
}

fn read_json(path: &Path, compressed: bool) -> Result<SimSnapshot> {
    let json = if compressed {
        let mut decoder = GzDecoder::new(File::open(path)?);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|e| IoError::compression(e.to_string()))?;
        text
    } else {
        std::fs::read_to_string(path)?
    };
    from_json(&json)
}

/// Writes a snapshot as JSON, gzip-compressed when the path ends in `.gz`.
pub fn save_snapshot_json<P: AsRef<Path>>(snapshot: &SimSnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let compress = SaveFormat::from_path(path) == SaveFormat::JsonGz;
    save_snapshot_as(
        snapshot,
        path,
        if compress { SaveFormat::JsonGz } else { SaveFormat::Json },
    )
}

/// Reads a snapshot written by [`save_snapshot_json`].
pub fn load_snapshot_json<P: AsRef<Path>>(path: P) -> Result<SimSnapshot> {
    let path = path.as_ref();
    let compressed = SaveFormat::from_path(path) == SaveFormat::JsonGz;
    load_snapshot_as(
        path,
        if compressed { SaveFormat::JsonGz } else { SaveFormat::Json },
    )
}

pub fn save_rkyv<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize<AllocSerializer<4096>>,
    T: Archive,
    P: AsRef<Path>,
{
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(data)
        .map_err(|e| IoError::rkyv(format!("serialization failed: {:?}", e)))?;
    let bytes = serializer.into_serializer().into_inner();
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

pub fn load_rkyv<T, P>(path: P) -> Result<T>
where
    T: Archive,
    T::Archived: Deserialize<T, SharedDeserializeMap>
        + for<'a> rkyv::CheckBytes<rkyv::validation::validators::DefaultValidator<'a>>,
    P: AsRef<Path>,
{
    let raw = std::fs::read(path)?;
    let mut bytes = rkyv::AlignedVec::with_capacity(raw.len());
    bytes.extend_from_slice(&raw);
    let archived = rkyv::check_archived_root::<T>(&bytes)
        .map_err(|e| IoError::rkyv(format!("validation failed: {:?}", e)))?;
    let mut deserializer = SharedDeserializeMap::default();
    archived
        .deserialize(&mut deserializer)
        .map_err(|e| IoError::rkyv(format!("deserialization failed: {:?}", e)))
}

/// Saves in an explicit format, whatever the extension says.
pub fn save_snapshot_as<P: AsRef<Path>>(
    snapshot: &SimSnapshot,
    path: P,
    format: SaveFormat,
) -> Result<()> {
    let path = path.as_ref();
    match format {
        SaveFormat::Json => write_json(snapshot, path, false)?,
        SaveFormat::JsonGz => write_json(snapshot, path, true)?,
        SaveFormat::Rkyv => save_rkyv(snapshot, path)?,
    }
    tracing::info!(
        path = %path.display(),
        tick = snapshot.tick,
        format = ?format,
        "Snapshot saved"
    );
    Ok(())
}

/// Loads an explicit format, then checks array lengths against the dimensions.
pub fn load_snapshot_as<P: AsRef<Path>>(path: P, format: SaveFormat) -> Result<SimSnapshot> {
    let path = path.as_ref();
    let snapshot = match format {
        SaveFormat::Json => read_json(path, false)?,
        SaveFormat::JsonGz => read_json(path, true)?,
        SaveFormat::Rkyv => load_rkyv::<SimSnapshot, _>(path)?,
    };
    validated(snapshot).map_err(|e| e.with_context(format!("loading {}", path.display())))
}

/// Saves in whichever format the extension names.
pub fn save_snapshot<P: AsRef<Path>>(snapshot: &SimSnapshot, path: P) -> Result<()> {
    let format = SaveFormat::from_path(&path);
    save_snapshot_as(snapshot, path, format)
}

/// Loads in whichever format the extension names.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<SimSnapshot> {
    let format = SaveFormat::from_path(&path);
    load_snapshot_as(path, format)
}
