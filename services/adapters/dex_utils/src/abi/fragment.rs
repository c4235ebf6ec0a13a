//! ABI function fragments
//!
//! A fragment keeps the parameter *names* of a function (including tuple
//! component names), which `ethabi::ParamType` alone discards. Fragments are
//! built by hand for the bundled router ABIs or parsed from ABI JSON as
//! returned by a block explorer.

use ethabi::ParamType;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use super::decoder::AbiError;

/// One input parameter of a function, as written in ABI JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            components: Vec::new(),
        }
    }

    /// Tuple parameter; `kind` is `tuple` or an array of tuples (`tuple[]`)
    pub fn tuple(name: &str, kind: &str, components: Vec<AbiParam>) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            components,
        }
    }

    /// Resolve the ethabi type of this parameter
    pub fn param_type(&self) -> Result<ParamType, AbiError> {
        let (base, dims) = split_array_dims(&self.kind)?;

        let mut resolved = if base == "tuple" {
            ParamType::Tuple(
                self.components
                    .iter()
                    .map(AbiParam::param_type)
                    .collect::<Result<Vec<_>, _>>()?,
            )
        } else {
            elementary_type(base).ok_or_else(|| AbiError::UnsupportedType(self.kind.clone()))?
        };

        for dim in dims {
            resolved = match dim {
                None => ParamType::Array(Box::new(resolved)),
                Some(len) => ParamType::FixedArray(Box::new(resolved), len),
            };
        }
        Ok(resolved)
    }

    /// Canonical type string used for selector computation
    pub fn canonical_type(&self) -> Result<String, AbiError> {
        let (base, _) = split_array_dims(&self.kind)?;
        let suffix = &self.kind[base.len()..];

        if base == "tuple" {
            let inner = self
                .components
                .iter()
                .map(AbiParam::canonical_type)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(format!("({}){}", inner.join(","), suffix));
        }

        let canonical_base = match base {
            "uint" => "uint256",
            "int" => "int256",
            other => other,
        };
        Ok(format!("{}{}", canonical_base, suffix))
    }
}

/// A callable function: name plus named inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFragment {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

impl FunctionFragment {
    pub fn new(name: &str, inputs: Vec<AbiParam>) -> Self {
        Self {
            name: name.to_string(),
            inputs,
        }
    }

    /// `name(type,type,...)` in canonical form
    pub fn signature(&self) -> Result<String, AbiError> {
        let types = self
            .inputs
            .iter()
            .map(AbiParam::canonical_type)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}({})", self.name, types.join(",")))
    }

    /// First four bytes of keccak256 over the canonical signature
    pub fn selector(&self) -> Result<[u8; 4], AbiError> {
        let digest = Keccak256::digest(self.signature()?.as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&digest[..4]);
        Ok(selector)
    }

    pub fn param_types(&self) -> Result<Vec<ParamType>, AbiError> {
        self.inputs.iter().map(AbiParam::param_type).collect()
    }
}

#[derive(Deserialize)]
struct AbiItem {
    #[serde(rename = "type", default = "default_item_type")]
    item_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

fn default_item_type() -> String {
    "function".to_string()
}

/// Parse a JSON ABI array, keeping only `function` entries
pub fn parse_abi_json(json: &str) -> Result<Vec<FunctionFragment>, AbiError> {
    let items: Vec<AbiItem> =
        serde_json::from_str(json).map_err(|e| AbiError::InvalidJson(e.to_string()))?;

    Ok(items
        .into_iter()
        .filter(|item| item.item_type == "function")
        .map(|item| FunctionFragment {
            name: item.name,
            inputs: item.inputs,
        })
        .collect())
}

/// Split `uint256[][3]` into (`uint256`, [None, Some(3)])
fn split_array_dims(kind: &str) -> Result<(&str, Vec<Option<usize>>), AbiError> {
    let base_end = kind.find('[').unwrap_or(kind.len());
    let base = &kind[..base_end];
    let mut rest = &kind[base_end..];
    let mut dims = Vec::new();

    while !rest.is_empty() {
        let close = rest
            .find(']')
            .filter(|_| rest.starts_with('['))
            .ok_or_else(|| AbiError::UnsupportedType(kind.to_string()))?;
        let dim = &rest[1..close];
        if dim.is_empty() {
            dims.push(None);
        } else {
            let len = dim
                .parse::<usize>()
                .map_err(|_| AbiError::UnsupportedType(kind.to_string()))?;
            dims.push(Some(len));
        }
        rest = &rest[close + 1..];
    }

    if base.is_empty() {
        return Err(AbiError::UnsupportedType(kind.to_string()));
    }
    Ok((base, dims))
}

fn elementary_type(base: &str) -> Option<ParamType> {
    match base {
        "address" => Some(ParamType::Address),
        "bool" => Some(ParamType::Bool),
        "string" => Some(ParamType::String),
        "bytes" => Some(ParamType::Bytes),
        "uint" => Some(ParamType::Uint(256)),
        "int" => Some(ParamType::Int(256)),
        _ => {
            if let Some(bits) = base.strip_prefix("uint") {
                bits.parse::<usize>()
                    .ok()
                    .filter(|b| *b > 0 && *b <= 256 && b % 8 == 0)
                    .map(ParamType::Uint)
            } else if let Some(bits) = base.strip_prefix("int") {
                bits.parse::<usize>()
                    .ok()
                    .filter(|b| *b > 0 && *b <= 256 && b % 8 == 0)
                    .map(ParamType::Int)
            } else if let Some(len) = base.strip_prefix("bytes") {
                len.parse::<usize>()
                    .ok()
                    .filter(|l| *l > 0 && *l <= 32)
                    .map(ParamType::FixedBytes)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elementary_and_array_types() {
        assert_eq!(
            AbiParam::new("path", "address[]").param_type().unwrap(),
            ParamType::Array(Box::new(ParamType::Address))
        );
        assert_eq!(
            AbiParam::new("fee", "uint24").param_type().unwrap(),
            ParamType::Uint(24)
        );
        assert_eq!(
            AbiParam::new("grid", "uint8[2][]").param_type().unwrap(),
            ParamType::Array(Box::new(ParamType::FixedArray(
                Box::new(ParamType::Uint(8)),
                2
            )))
        );
        assert!(AbiParam::new("x", "uint7").param_type().is_err());
        assert!(AbiParam::new("x", "mapping").param_type().is_err());
        assert!(AbiParam::new("x", "address[").param_type().is_err());
    }

    #[test]
    fn test_tuple_canonical_type() {
        let param = AbiParam::tuple(
            "params",
            "tuple",
            vec![
                AbiParam::new("path", "bytes"),
                AbiParam::new("recipient", "address"),
                AbiParam::new("amountIn", "uint"),
            ],
        );
        assert_eq!(param.canonical_type().unwrap(), "(bytes,address,uint256)");
    }

    #[test]
    fn test_known_selector() {
        let transfer = FunctionFragment::new(
            "transfer",
            vec![
                AbiParam::new("to", "address"),
                AbiParam::new("amount", "uint256"),
            ],
        );
        assert_eq!(transfer.signature().unwrap(), "transfer(address,uint256)");
        assert_eq!(transfer.selector().unwrap(), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_parse_abi_json_keeps_functions_only() {
        let json = r#"[
            {"type":"constructor","inputs":[{"name":"weth","type":"address"}]},
            {"type":"event","name":"Swap","inputs":[]},
            {"type":"function","name":"multicall","inputs":[{"name":"data","type":"bytes[]"}]},
            {"name":"legacy","inputs":[]}
        ]"#;

        let fragments = parse_abi_json(json).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].name, "multicall");
        assert_eq!(fragments[0].inputs[0].kind, "bytes[]");
        assert_eq!(fragments[1].name, "legacy");
    }

    #[test]
    fn test_parse_abi_json_rejects_garbage() {
        assert!(matches!(
            parse_abi_json("not json"),
            Err(AbiError::InvalidJson(_))
        ));
    }
}
