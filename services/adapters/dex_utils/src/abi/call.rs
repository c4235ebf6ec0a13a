//! Decoded call tree
//!
//! Output of the ABI decoder: the function name plus its named parameters,
//! with tuple arguments kept as named structs so struct fields such as
//! `tokenIn` can be looked up by name.

use ethabi::Token;
use ethereum_types::{Address, U256};

use super::fragment::AbiParam;

/// Leaf value of a decoded argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Address(Address),
    Uint(U256),
    /// Two's complement representation, as decoded by ethabi
    Int(U256),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Struct(Vec<Parameter>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub function_name: String,
    pub parameters: Vec<Parameter>,
}

impl Parameter {
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

impl DecodedCall {
    pub fn new(function_name: &str, parameters: Vec<Parameter>) -> Self {
        Self {
            function_name: function_name.to_string(),
            parameters,
        }
    }

    /// Look up a top-level parameter by name
    pub fn param(&self, name: &str) -> Option<&Value> {
        find_parameter(&self.parameters, name)
    }

    /// Fields of the call's single struct argument, if it has exactly one
    /// parameter and that parameter is a struct
    pub fn sole_struct(&self) -> Option<&[Parameter]> {
        match self.parameters.as_slice() {
            [only] => match &only.value {
                Value::Struct(fields) => Some(fields.as_slice()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Value {
    pub fn address(address: Address) -> Self {
        Value::Scalar(Scalar::Address(address))
    }

    pub fn uint(value: U256) -> Self {
        Value::Scalar(Scalar::Uint(value))
    }

    pub fn bytes(bytes: Vec<u8>) -> Self {
        Value::Scalar(Scalar::Bytes(bytes))
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Scalar(Scalar::Address(address)) => Some(*address),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Scalar(Scalar::Uint(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Scalar(Scalar::Bytes(bytes)) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Named field of a struct value
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => find_parameter(fields, name),
            _ => None,
        }
    }

    /// Convert an ethabi token, naming tuple fields after `param`'s components
    pub fn from_token(token: Token, param: &AbiParam) -> Self {
        Self::from_token_with_components(token, &param.components)
    }

    fn from_token_with_components(token: Token, components: &[AbiParam]) -> Self {
        match token {
            Token::Address(address) => Value::Scalar(Scalar::Address(address)),
            Token::Uint(value) => Value::Scalar(Scalar::Uint(value)),
            Token::Int(value) => Value::Scalar(Scalar::Int(value)),
            Token::Bool(flag) => Value::Scalar(Scalar::Bool(flag)),
            Token::Bytes(bytes) | Token::FixedBytes(bytes) => Value::Scalar(Scalar::Bytes(bytes)),
            Token::String(text) => Value::Scalar(Scalar::String(text)),
            Token::Array(items) | Token::FixedArray(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(|item| Self::from_token_with_components(item, components))
                    .collect(),
            ),
            Token::Tuple(items) => Value::Struct(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| match components.get(index) {
                        Some(component) => Parameter {
                            name: component.name.clone(),
                            value: Value::from_token(item, component),
                        },
                        None => Parameter {
                            name: index.to_string(),
                            value: Self::from_token_with_components(item, &[]),
                        },
                    })
                    .collect(),
            ),
        }
    }
}

/// Value of the parameter called `name`
pub fn find_parameter<'a>(parameters: &'a [Parameter], name: &str) -> Option<&'a Value> {
    parameters
        .iter()
        .find(|param| param.name == name)
        .map(|param| &param.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_token_gets_component_names() {
        let param = AbiParam::tuple(
            "params",
            "tuple",
            vec![
                AbiParam::new("tokenIn", "address"),
                AbiParam::new("tokenOut", "address"),
            ],
        );
        let token = Token::Tuple(vec![
            Token::Address(Address::from_low_u64_be(1)),
            Token::Address(Address::from_low_u64_be(2)),
        ]);

        let value = Value::from_token(token, &param);
        assert_eq!(
            value.field("tokenIn").and_then(Value::as_address),
            Some(Address::from_low_u64_be(1))
        );
        assert_eq!(
            value.field("tokenOut").and_then(Value::as_address),
            Some(Address::from_low_u64_be(2))
        );
        assert!(value.field("fee").is_none());
    }

    #[test]
    fn test_sole_struct_requires_single_struct_parameter() {
        let with_struct = DecodedCall::new(
            "exactInputSingle",
            vec![Parameter::new("params", Value::Struct(vec![]))],
        );
        assert!(with_struct.sole_struct().is_some());

        let flat = DecodedCall::new(
            "swap",
            vec![
                Parameter::new("amountIn", Value::uint(U256::one())),
                Parameter::new("deadline", Value::uint(U256::one())),
            ],
        );
        assert!(flat.sole_struct().is_none());
        assert_eq!(flat.param("deadline"), Some(&Value::uint(U256::one())));
    }
}
