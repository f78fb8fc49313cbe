//! Registry snapshots: `.reg` export files and live registry access.
//!
//! Keys handled by the tool all live under `HKEY_CURRENT_USER`; the
//! [`Registry`] trait takes paths relative to that root. Exported files keep
//! the full `HKEY_CURRENT_USER\...` form used by `regedit`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use crate::LibError;

/// Root key every managed registry path lives under.
pub const HKCU_ROOT: &str = "HKEY_CURRENT_USER";

/// Parent key of the per-ROM VPinMAME settings.
pub const VPINMAME_REG_KEY: &str = r"Software\Freeware\Visual PinMame";

const REGEDIT_HEADER: &str = "Windows Registry Editor Version 5.00";
const REGEDIT4_HEADER: &str = "REGEDIT4";

/// `REG_BINARY` value type, the default for `hex:` data.
pub const REG_BINARY: u32 = 3;

/// A registry value as written in `.reg` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegValue {
    /// `"name"="text"` (`REG_SZ`)
    String(String),
    /// `"name"=dword:0000000a`
    Dword(u32),
    /// `"name"=hex:..` or `"name"=hex(N):..`, `kind` being the value type
    Hex { kind: u32, bytes: Vec<u8> },
}

impl RegValue {
    fn to_reg_data(&self) -> String {
        match self {
            Self::String(s) => format!("\"{}\"", escape_reg_string(s)),
            Self::Dword(v) => format!("dword:{v:08x}"),
            Self::Hex { kind, bytes } => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
                if *kind == REG_BINARY {
                    format!("hex:{}", hex.join(","))
                } else {
                    format!("hex({kind:x}):{}", hex.join(","))
                }
            }
        }
    }
}

/// One `[key]` section of a `.reg` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegKeyEntry {
    /// Full key path, including the root hive name
    pub path: String,
    /// `[-key]` sections remove the key instead of setting values
    pub delete: bool,
    /// Values in file order; the default value has an empty name
    pub values: Vec<(String, RegValue)>,
}

/// Parsed `.reg` export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegFile {
    pub keys: Vec<RegKeyEntry>,
}

impl RegFile {
    /// Read and parse a `.reg` file (UTF-16LE with BOM, or UTF-8).
    pub fn load(path: &Path) -> Result<Self, LibError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&decode_reg_bytes(&bytes))
            .map_err(|message| LibError::invalid_reg_file(path, message))
    }

    /// Parse `.reg` text.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut file = RegFile::default();
        let mut current: Option<RegKeyEntry> = None;

        for line in logical_lines(text) {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with(';')
                || line == REGEDIT_HEADER
                || line == REGEDIT4_HEADER
            {
                continue;
            }

            if let Some(section) = line.strip_prefix('[') {
                let section = section
                    .strip_suffix(']')
                    .ok_or_else(|| format!("unterminated key line: {line}"))?;
                if let Some(entry) = current.take() {
                    file.keys.push(entry);
                }
                let (delete, path) = match section.strip_prefix('-') {
                    Some(path) => (true, path),
                    None => (false, section),
                };
                current = Some(RegKeyEntry {
                    path: path.to_string(),
                    delete,
                    values: Vec::new(),
                });
                continue;
            }

            let entry = current
                .as_mut()
                .ok_or_else(|| format!("value outside of a key: {line}"))?;
            let (name, data) = split_value_line(line)?;
            // `"name"=-` removes a value; nothing to compare or import
            if data == "-" {
                continue;
            }
            entry.values.push((name, parse_value_data(data)?));
        }

        if let Some(entry) = current.take() {
            file.keys.push(entry);
        }
        Ok(file)
    }

    /// Keys of the file that live under `HKEY_CURRENT_USER`, relative to it.
    pub fn user_keys(&self) -> Vec<&str> {
        self.keys
            .iter()
            .filter_map(|k| strip_user_root(&k.path))
            .collect()
    }

    /// Serialize in `regedit` format.
    pub fn to_reg_string(&self) -> String {
        let mut out = String::new();
        out.push_str(REGEDIT_HEADER);
        out.push_str("\r\n\r\n");
        for key in &self.keys {
            if key.delete {
                out.push_str(&format!("[-{}]\r\n\r\n", key.path));
                continue;
            }
            out.push_str(&format!("[{}]\r\n", key.path));
            for (name, value) in &key.values {
                let name = if name.is_empty() {
                    "@".to_string()
                } else {
                    format!("\"{}\"", escape_reg_string(name))
                };
                out.push_str(&format!("{}={}\r\n", name, value.to_reg_data()));
            }
            out.push_str("\r\n");
        }
        out
    }

    /// Write the file as UTF-16LE with a byte-order mark, as `regedit` does.
    pub fn to_utf16_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in self.to_reg_string().encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }
}

/// Strip the `HKEY_CURRENT_USER\` prefix; `None` for other hives.
pub fn strip_user_root(key: &str) -> Option<&str> {
    key.strip_prefix(HKCU_ROOT)
        .or_else(|| key.strip_prefix("HKCU"))
        .and_then(|rest| rest.strip_prefix('\\'))
}

/// Prefix a key relative to `HKEY_CURRENT_USER` with the hive name.
pub fn with_user_root(key: &str) -> String {
    format!("{HKCU_ROOT}\\{key}")
}

fn decode_reg_bytes(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(body).into_owned()
}

/// Join lines continued with a trailing backslash (long `hex:` values).
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for raw in text.lines() {
        let line = raw.trim_end_matches('\r');
        let piece = if pending.is_empty() { line } else { line.trim_start() };
        match piece.strip_suffix('\\') {
            Some(head) if !line.trim_start().starts_with('[') => pending.push_str(head),
            _ => {
                pending.push_str(piece);
                lines.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.is_empty() {
        lines.push(pending);
    }
    lines
}

fn split_value_line(line: &str) -> Result<(String, &str), String> {
    if let Some(rest) = line.strip_prefix('@') {
        let data = rest
            .trim_start()
            .strip_prefix('=')
            .ok_or_else(|| format!("missing '=' in value line: {line}"))?;
        return Ok((String::new(), data.trim()));
    }

    let rest = line
        .strip_prefix('"')
        .ok_or_else(|| format!("invalid value line: {line}"))?;
    let (name, after) =
        read_quoted(rest).ok_or_else(|| format!("unterminated value name: {line}"))?;
    let data = after
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| format!("missing '=' in value line: {line}"))?;
    Ok((name, data.trim()))
}

/// Read a quoted string body (opening quote already consumed). Returns the
/// unescaped text and what follows the closing quote.
fn read_quoted(s: &str) -> Option<(String, &str)> {
    let mut out = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, next) = chars.next()?;
                out.push(next);
            }
            '"' => return Some((out, &s[i + 1..])),
            _ => out.push(c),
        }
    }
    None
}

fn parse_value_data(data: &str) -> Result<RegValue, String> {
    if let Some(rest) = data.strip_prefix('"') {
        let (text, tail) =
            read_quoted(rest).ok_or_else(|| format!("unterminated string value: {data}"))?;
        if !tail.trim().is_empty() {
            return Err(format!("trailing data after string value: {data}"));
        }
        return Ok(RegValue::String(text));
    }
    if let Some(hex) = data.strip_prefix("dword:") {
        let value = u32::from_str_radix(hex.trim(), 16)
            .map_err(|_| format!("invalid dword value: {data}"))?;
        return Ok(RegValue::Dword(value));
    }
    if let Some(rest) = data.strip_prefix("hex") {
        let (kind, bytes) = if let Some(list) = rest.strip_prefix(':') {
            (REG_BINARY, list)
        } else {
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.split_once("):"))
                .ok_or_else(|| format!("invalid hex value: {data}"))?;
            let kind = u32::from_str_radix(inner.0.trim(), 16)
                .map_err(|_| format!("invalid hex type: {data}"))?;
            (kind, inner.1)
        };
        let bytes = bytes
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(|b| u8::from_str_radix(b, 16).map_err(|_| format!("invalid hex byte '{b}'")))
            .collect::<Result<Vec<u8>, String>>()?;
        return Ok(RegValue::Hex { kind, bytes });
    }
    Err(format!("unsupported value data: {data}"))
}

fn escape_reg_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Live registry access, rooted at `HKEY_CURRENT_USER`.
pub trait Registry: Send + Sync {
    fn key_exists(&self, key: &str) -> Result<bool, LibError>;

    fn read_value(&self, key: &str, name: &str) -> Result<Option<RegValue>, LibError>;

    /// Every value of a key; a missing key has none.
    fn values(&self, key: &str) -> Result<Vec<(String, RegValue)>, LibError>;

    fn create_key(&self, key: &str) -> Result<(), LibError>;

    fn write_value(&self, key: &str, name: &str, value: &RegValue) -> Result<(), LibError>;

    /// Delete a key and its sub-keys. Returns `false` when it did not exist.
    fn delete_key(&self, key: &str) -> Result<bool, LibError>;

    /// True when every value of every user key in the exported file is
    /// present in the live registry with the same data. Keys without values
    /// only need to exist. Sections under other hives are ignored.
    fn matches_exported_file(&self, path: &Path) -> Result<bool, LibError> {
        let file = RegFile::load(path)?;
        for entry in file.keys.iter().filter(|k| !k.delete) {
            let Some(key) = strip_user_root(&entry.path) else {
                continue;
            };
            if entry.values.is_empty() && !self.key_exists(key)? {
                return Ok(false);
            }
            for (name, expected) in &entry.values {
                match self.read_value(key, name)? {
                    Some(actual) if actual == *expected => {}
                    _ => return Ok(false),
                }
            }
        }
        Ok(true)
    }

    /// Apply an exported file to the live registry. Returns the number of
    /// values written.
    fn import_file(&self, path: &Path) -> Result<usize, LibError> {
        let file = RegFile::load(path)?;
        let mut written = 0;
        for entry in &file.keys {
            let Some(key) = strip_user_root(&entry.path) else {
                log::warn!("Skipping registry key outside {HKCU_ROOT}: {}", entry.path);
                continue;
            };
            if entry.delete {
                self.delete_key(key)?;
                continue;
            }
            self.create_key(key)?;
            for (name, value) in &entry.values {
                self.write_value(key, name, value)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Snapshot one key (without sub-keys) as an exportable file.
    fn export_key(&self, key: &str) -> Result<RegFile, LibError> {
        Ok(RegFile {
            keys: vec![RegKeyEntry {
                path: with_user_root(key),
                delete: false,
                values: self.values(key)?,
            }],
        })
    }
}

/// In-memory registry snapshot.
///
/// Used on platforms without a registry and by tests. Key paths and value
/// names are case-insensitive, as on Windows.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: Mutex<BTreeMap<String, BTreeMap<String, (String, RegValue)>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot holding every user key of an exported file.
    pub fn from_reg_file(file: &RegFile) -> Result<Self, LibError> {
        let registry = Self::new();
        for entry in file.keys.iter().filter(|k| !k.delete) {
            if let Some(key) = strip_user_root(&entry.path) {
                registry.create_key(key)?;
                for (name, value) in &entry.values {
                    registry.write_value(key, name, value)?;
                }
            }
        }
        Ok(registry)
    }

    fn lock(
        &self,
    ) -> Result<
        std::sync::MutexGuard<'_, BTreeMap<String, BTreeMap<String, (String, RegValue)>>>,
        LibError,
    > {
        self.keys
            .lock()
            .map_err(|_| LibError::registry("registry snapshot lock poisoned"))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim_matches('\\').to_lowercase()
}

impl Registry for MemoryRegistry {
    fn key_exists(&self, key: &str) -> Result<bool, LibError> {
        let key = normalize_key(key);
        let prefix = format!("{key}\\");
        Ok(self
            .lock()?
            .keys()
            .any(|k| *k == key || k.starts_with(&prefix)))
    }

    fn read_value(&self, key: &str, name: &str) -> Result<Option<RegValue>, LibError> {
        Ok(self
            .lock()?
            .get(&normalize_key(key))
            .and_then(|values| values.get(&name.to_lowercase()))
            .map(|(_, value)| value.clone()))
    }

    fn values(&self, key: &str) -> Result<Vec<(String, RegValue)>, LibError> {
        Ok(self
            .lock()?
            .get(&normalize_key(key))
            .map(|values| values.values().cloned().collect())
            .unwrap_or_default())
    }

    fn create_key(&self, key: &str) -> Result<(), LibError> {
        self.lock()?.entry(normalize_key(key)).or_default();
        Ok(())
    }

    fn write_value(&self, key: &str, name: &str, value: &RegValue) -> Result<(), LibError> {
        self.lock()?
            .entry(normalize_key(key))
            .or_default()
            .insert(name.to_lowercase(), (name.to_string(), value.clone()));
        Ok(())
    }

    fn delete_key(&self, key: &str) -> Result<bool, LibError> {
        let key = normalize_key(key);
        let prefix = format!("{key}\\");
        let mut keys = self.lock()?;
        let before = keys.len();
        keys.retain(|k, _| *k != key && !k.starts_with(&prefix));
        Ok(keys.len() != before)
    }
}

#[cfg(target_os = "windows")]
pub use windows::WindowsRegistry;

#[cfg(target_os = "windows")]
mod windows {
    use std::io;

    use winreg::RegKey;
    use winreg::RegValue as RawValue;
    use winreg::enums::{HKEY_CURRENT_USER, RegType};

    use super::{RegValue, Registry};
    use crate::LibError;

    /// The live `HKEY_CURRENT_USER` hive.
    pub struct WindowsRegistry {
        root: RegKey,
    }

    impl WindowsRegistry {
        pub fn current_user() -> Self {
            Self {
                root: RegKey::predef(HKEY_CURRENT_USER),
            }
        }

        fn open(&self, key: &str) -> Result<Option<RegKey>, LibError> {
            match self.root.open_subkey(key) {
                Ok(k) => Ok(Some(k)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
    }

    impl Default for WindowsRegistry {
        fn default() -> Self {
            Self::current_user()
        }
    }

    fn from_raw(raw: RawValue) -> RegValue {
        match raw.vtype {
            RegType::REG_SZ => {
                let units: Vec<u16> = raw
                    .bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                RegValue::String(
                    String::from_utf16_lossy(&units)
                        .trim_end_matches('\0')
                        .to_string(),
                )
            }
            RegType::REG_DWORD if raw.bytes.len() == 4 => RegValue::Dword(u32::from_le_bytes([
                raw.bytes[0],
                raw.bytes[1],
                raw.bytes[2],
                raw.bytes[3],
            ])),
            other => RegValue::Hex {
                kind: other as u32,
                bytes: raw.bytes,
            },
        }
    }

    fn to_raw(value: &RegValue) -> RawValue {
        match value {
            RegValue::String(s) => {
                let mut bytes = Vec::with_capacity((s.len() + 1) * 2);
                for unit in s.encode_utf16().chain(std::iter::once(0)) {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                RawValue {
                    bytes,
                    vtype: RegType::REG_SZ,
                }
            }
            RegValue::Dword(v) => RawValue {
                bytes: v.to_le_bytes().to_vec(),
                vtype: RegType::REG_DWORD,
            },
            RegValue::Hex { kind, bytes } => RawValue {
                bytes: bytes.clone(),
                vtype: reg_type(*kind),
            },
        }
    }

    fn reg_type(kind: u32) -> RegType {
        match kind {
            0 => RegType::REG_NONE,
            1 => RegType::REG_SZ,
            2 => RegType::REG_EXPAND_SZ,
            4 => RegType::REG_DWORD,
            7 => RegType::REG_MULTI_SZ,
            11 => RegType::REG_QWORD,
            _ => RegType::REG_BINARY,
        }
    }

    impl Registry for WindowsRegistry {
        fn key_exists(&self, key: &str) -> Result<bool, LibError> {
            Ok(self.open(key)?.is_some())
        }

        fn read_value(&self, key: &str, name: &str) -> Result<Option<RegValue>, LibError> {
            let Some(k) = self.open(key)? else {
                return Ok(None);
            };
            match k.get_raw_value(name) {
                Ok(raw) => Ok(Some(from_raw(raw))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn values(&self, key: &str) -> Result<Vec<(String, RegValue)>, LibError> {
            let Some(k) = self.open(key)? else {
                return Ok(Vec::new());
            };
            let mut values = Vec::new();
            for item in k.enum_values() {
                let (name, raw) = item?;
                values.push((name, from_raw(raw)));
            }
            Ok(values)
        }

        fn create_key(&self, key: &str) -> Result<(), LibError> {
            self.root.create_subkey(key)?;
            Ok(())
        }

        fn write_value(&self, key: &str, name: &str, value: &RegValue) -> Result<(), LibError> {
            let (k, _) = self.root.create_subkey(key)?;
            k.set_raw_value(name, &to_raw(value))?;
            Ok(())
        }

        fn delete_key(&self, key: &str) -> Result<bool, LibError> {
            if !self.key_exists(key)? {
                return Ok(false);
            }
            self.root.delete_subkey_all(key)?;
            Ok(true)
        }
    }
}

/// The registry of the running system: the live hive on Windows, an empty
/// in-memory snapshot elsewhere.
pub fn system_registry() -> Box<dyn Registry> {
    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsRegistry::current_user())
    }
    #[cfg(not(target_os = "windows"))]
    {
        log::debug!("No system registry on this platform; using an empty snapshot");
        Box::new(MemoryRegistry::new())
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
