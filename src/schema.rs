//! Contract module schemas and parameter serialization
//!
//! A [`ModuleSchema`] describes, per contract, the shape of the init
//! parameter and of each receive entry point. JSON parameters supplied by
//! the caller are encoded against the declared [`SchemaType`] before
//! submission.
//!
//! Validation is strict: a JSON value whose shape does not match the
//! schema is an error before anything reaches the wallet. Nothing is
//! coerced.
//!
//! # Binary layout
//!
//! The schema blob is versioned (`SCHEMA_VERSION`), little-endian, with
//! u32 length prefixes on strings, maps and lists. Type encodings are a
//! single tag byte followed by type-specific payload (fixed byte-array
//! width, list element type, struct field table).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::MintError;
use crate::Result;

/// Schema format version, also passed to the wallet alongside the blob.
pub const SCHEMA_VERSION: u8 = 2;

mod tag {
    pub const UNIT: u8 = 0;
    pub const BOOL: u8 = 1;
    pub const U8: u8 = 2;
    pub const U16: u8 = 3;
    pub const U32: u8 = 4;
    pub const U64: u8 = 5;
    pub const STRING: u8 = 6;
    pub const BYTE_ARRAY: u8 = 7;
    pub const LIST: u8 = 8;
    pub const STRUCT: u8 = 9;
}

/// Shape of a single contract parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Unit,
    Bool,
    U8,
    U16,
    U32,
    U64,
    /// UTF-8 string, u32 length prefix.
    String,
    /// Fixed-width byte array, supplied as a hex string of exactly this
    /// many bytes (token ids use this with the contract's token-id width).
    ByteArray(u32),
    /// Homogeneous list, u32 length prefix.
    List(Box<SchemaType>),
    /// Named fields, encoded in declaration order.
    Struct(Vec<(String, SchemaType)>),
}

impl SchemaType {
    /// Encode `value` against this type, appending to `out`.
    ///
    /// Every mismatch between the declared type and the JSON value is an
    /// error naming the offending `path`.
    pub fn serialize_value(&self, value: &Value, path: &str, out: &mut Vec<u8>) -> Result<()> {
        match self {
            SchemaType::Unit => match value {
                Value::Null => Ok(()),
                other => Err(mismatch(path, "null", other)),
            },
            SchemaType::Bool => match value {
                Value::Bool(b) => {
                    out.push(*b as u8);
                    Ok(())
                }
                other => Err(mismatch(path, "bool", other)),
            },
            SchemaType::U8 => {
                let n = unsigned_in_range(value, u8::MAX as u64, path, "u8")?;
                out.push(n as u8);
                Ok(())
            }
            SchemaType::U16 => {
                let n = unsigned_in_range(value, u16::MAX as u64, path, "u16")?;
                out.extend_from_slice(&(n as u16).to_le_bytes());
                Ok(())
            }
            SchemaType::U32 => {
                let n = unsigned_in_range(value, u32::MAX as u64, path, "u32")?;
                out.extend_from_slice(&(n as u32).to_le_bytes());
                Ok(())
            }
            SchemaType::U64 => {
                let n = unsigned_in_range(value, u64::MAX, path, "u64")?;
                out.extend_from_slice(&n.to_le_bytes());
                Ok(())
            }
            SchemaType::String => match value {
                Value::String(s) => {
                    write_len(s.len(), path, out)?;
                    out.extend_from_slice(s.as_bytes());
                    Ok(())
                }
                other => Err(mismatch(path, "string", other)),
            },
            SchemaType::ByteArray(size) => match value {
                Value::String(s) => {
                    let bytes = hex::decode(s).map_err(|e| {
                        MintError::Schema(format!("{}: invalid hex byte array: {}", path, e))
                    })?;
                    if bytes.len() != *size as usize {
                        return Err(MintError::Schema(format!(
                            "{}: expected {} bytes, got {}",
                            path,
                            size,
                            bytes.len()
                        )));
                    }
                    out.extend_from_slice(&bytes);
                    Ok(())
                }
                other => Err(mismatch(path, "hex string", other)),
            },
            SchemaType::List(elem) => match value {
                Value::Array(items) => {
                    write_len(items.len(), path, out)?;
                    for (i, item) in items.iter().enumerate() {
                        elem.serialize_value(item, &format!("{}[{}]", path, i), out)?;
                    }
                    Ok(())
                }
                other => Err(mismatch(path, "array", other)),
            },
            SchemaType::Struct(fields) => match value {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !fields.iter().any(|(name, _)| name == key) {
                            return Err(MintError::Schema(format!(
                                "{}: unknown field `{}`",
                                path, key
                            )));
                        }
                    }
                    for (name, field_type) in fields {
                        let field_value = map.get(name).ok_or_else(|| {
                            MintError::Schema(format!("{}: missing field `{}`", path, name))
                        })?;
                        field_type.serialize_value(
                            field_value,
                            &format!("{}.{}", path, name),
                            out,
                        )?;
                    }
                    Ok(())
                }
                other => Err(mismatch(path, "object", other)),
            },
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            SchemaType::Unit => out.push(tag::UNIT),
            SchemaType::Bool => out.push(tag::BOOL),
            SchemaType::U8 => out.push(tag::U8),
            SchemaType::U16 => out.push(tag::U16),
            SchemaType::U32 => out.push(tag::U32),
            SchemaType::U64 => out.push(tag::U64),
            SchemaType::String => out.push(tag::STRING),
            SchemaType::ByteArray(size) => {
                out.push(tag::BYTE_ARRAY);
                out.extend_from_slice(&size.to_le_bytes());
            }
            SchemaType::List(elem) => {
                out.push(tag::LIST);
                elem.write(out);
            }
            SchemaType::Struct(fields) => {
                out.push(tag::STRUCT);
                out.extend_from_slice(&(fields.len() as u32).to_le_bytes());
                for (name, field_type) in fields {
                    write_string(name, out);
                    field_type.write(out);
                }
            }
        }
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            tag::UNIT => Ok(SchemaType::Unit),
            tag::BOOL => Ok(SchemaType::Bool),
            tag::U8 => Ok(SchemaType::U8),
            tag::U16 => Ok(SchemaType::U16),
            tag::U32 => Ok(SchemaType::U32),
            tag::U64 => Ok(SchemaType::U64),
            tag::STRING => Ok(SchemaType::String),
            tag::BYTE_ARRAY => Ok(SchemaType::ByteArray(reader.read_u32()?)),
            tag::LIST => Ok(SchemaType::List(Box::new(SchemaType::read(reader)?))),
            tag::STRUCT => {
                let count = reader.read_u32()?;
                let mut fields = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let name = reader.read_string()?;
                    fields.push((name, SchemaType::read(reader)?));
                }
                Ok(SchemaType::Struct(fields))
            }
            other => Err(MintError::Schema(format!("unknown type tag {}", other))),
        }
    }
}

/// Parameter shapes for one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractSchema {
    /// Init parameter, absent when the contract takes none.
    pub init: Option<SchemaType>,
    /// Receive entry points by unqualified name.
    pub receive: BTreeMap<String, SchemaType>,
}

/// Parsed module schema: parameter shapes for every contract in a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSchema {
    pub contracts: BTreeMap<String, ContractSchema>,
}

impl ModuleSchema {
    /// Parse the binary schema blob shipped with a contract module.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let version = reader.read_u8()?;
        if version != SCHEMA_VERSION {
            return Err(MintError::Schema(format!(
                "unsupported schema version {} (expected {})",
                version, SCHEMA_VERSION
            )));
        }

        let contract_count = reader.read_u32()?;
        let mut contracts = BTreeMap::new();
        for _ in 0..contract_count {
            let name = reader.read_string()?;
            let init = match reader.read_u8()? {
                0 => None,
                1 => Some(SchemaType::read(&mut reader)?),
                other => {
                    return Err(MintError::Schema(format!(
                        "invalid init-present flag {}",
                        other
                    )))
                }
            };

            let receive_count = reader.read_u32()?;
            let mut receive = BTreeMap::new();
            for _ in 0..receive_count {
                let entrypoint = reader.read_string()?;
                receive.insert(entrypoint, SchemaType::read(&mut reader)?);
            }

            contracts.insert(name, ContractSchema { init, receive });
        }

        reader.expect_end()?;
        Ok(Self { contracts })
    }

    /// Serialize back to the binary layout accepted by [`Self::from_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![SCHEMA_VERSION];
        out.extend_from_slice(&(self.contracts.len() as u32).to_le_bytes());
        for (name, contract) in &self.contracts {
            write_string(name, &mut out);
            match &contract.init {
                None => out.push(0),
                Some(init) => {
                    out.push(1);
                    init.write(&mut out);
                }
            }
            out.extend_from_slice(&(contract.receive.len() as u32).to_le_bytes());
            for (entrypoint, param) in &contract.receive {
                write_string(entrypoint, &mut out);
                param.write(&mut out);
            }
        }
        out
    }

    fn contract(&self, name: &str) -> Result<&ContractSchema> {
        self.contracts
            .get(name)
            .ok_or_else(|| MintError::Schema(format!("no schema for contract `{}`", name)))
    }
}

/// Serialize init parameters for `contract_name` against the module schema.
///
/// A contract with no declared init parameter accepts only `null` and
/// produces an empty byte string.
pub fn serialize_init_params(schema: &[u8], contract_name: &str, params: &Value) -> Result<Vec<u8>> {
    let module = ModuleSchema::from_bytes(schema)?;
    let contract = module.contract(contract_name)?;

    match &contract.init {
        None => match params {
            Value::Null => Ok(Vec::new()),
            _ => Err(MintError::Schema(format!(
                "contract `{}` takes no init parameter",
                contract_name
            ))),
        },
        Some(init) => {
            let mut out = Vec::new();
            init.serialize_value(params, "params", &mut out)?;
            Ok(out)
        }
    }
}

/// Serialize a receive message for `contract_name.entrypoint` against the
/// module schema.
pub fn serialize_update_params(
    schema: &[u8],
    contract_name: &str,
    entrypoint: &str,
    params: &Value,
) -> Result<Vec<u8>> {
    let module = ModuleSchema::from_bytes(schema)?;
    let contract = module.contract(contract_name)?;

    let param_type = contract.receive.get(entrypoint).ok_or_else(|| {
        MintError::Schema(format!(
            "contract `{}` has no entry point `{}`",
            contract_name, entrypoint
        ))
    })?;

    let mut out = Vec::new();
    param_type.serialize_value(params, "params", &mut out)?;
    Ok(out)
}

fn mismatch(path: &str, expected: &str, got: &Value) -> MintError {
    MintError::Schema(format!("{}: expected {}, got {}", path, expected, got))
}

fn unsigned_in_range(value: &Value, max: u64, path: &str, type_name: &str) -> Result<u64> {
    let n = value
        .as_u64()
        .ok_or_else(|| mismatch(path, type_name, value))?;
    if n > max {
        return Err(MintError::Schema(format!(
            "{}: {} out of range for {}",
            path, n, type_name
        )));
    }
    Ok(n)
}

fn write_len(len: usize, path: &str, out: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(len)
        .map_err(|_| MintError::Schema(format!("{}: length exceeds u32", path)))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(&(s.len() as u32).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

/// Bounds-checked cursor over the schema blob.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                MintError::Schema(format!("truncated schema at offset {}", self.pos))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| MintError::Schema(format!("invalid utf-8 in schema: {}", e)))
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(MintError::Schema(format!(
                "{} trailing bytes after schema",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}
