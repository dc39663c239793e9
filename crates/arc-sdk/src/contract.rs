//! Method registry
//!
//! Contract specification documents list the callable methods of an
//! application. The registry merges one or more documents into a
//! `name -> MethodSpec` table that the engine dispatches through.

use serde::Deserialize;
use std::collections::HashMap;

use crate::abi::{encode, method_selector, parse_type, AbiType, Token};
use crate::SdkError;

/// Bundled ARC200 standard document
pub const ARC200_SPEC: &str = include_str!("../abi/arc200.json");

/// Bundled ARC200 extension document (`hasBalance`, `hasAllowance`, `touch`)
pub const ARC200_EXTENSION_SPEC: &str = include_str!("../abi/arc200_extension.json");

/// Contract specification document as published alongside a contract
#[derive(Debug, Clone, Deserialize)]
pub struct ContractDocument {
    /// Contract name
    pub name: String,
    /// Description
    #[serde(default)]
    pub desc: Option<String>,
    /// Callable methods
    #[serde(default)]
    pub methods: Vec<MethodDocument>,
}

/// One method entry of a [`ContractDocument`]
#[derive(Debug, Clone, Deserialize)]
pub struct MethodDocument {
    /// Method name
    pub name: String,
    /// Ordered arguments
    #[serde(default)]
    pub args: Vec<ArgDocument>,
    /// Return type
    pub returns: ReturnDocument,
    /// Answerable by simulation alone
    #[serde(default)]
    pub readonly: bool,
}

/// Argument entry
#[derive(Debug, Clone, Deserialize)]
pub struct ArgDocument {
    /// Type descriptor
    #[serde(rename = "type")]
    pub type_name: String,
    /// Argument name
    #[serde(default)]
    pub name: Option<String>,
}

/// Return entry
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnDocument {
    /// Type descriptor, `void` for none
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Method argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodArg {
    /// Argument name, if the document gives one
    pub name: Option<String>,
    /// Declared type
    pub abi_type: AbiType,
}

/// Parsed method descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// Ordered arguments
    pub args: Vec<MethodArg>,
    /// Return type, `None` for `void`
    pub returns: Option<AbiType>,
    /// Answerable by simulation alone
    pub readonly: bool,
    /// Canonical signature, e.g. `arc200_transfer(address,uint256)bool`
    pub signature: String,
    /// First 4 bytes of SHA-512/256 of the signature
    pub selector: [u8; 4],
}

impl MethodSpec {
    /// Create a method descriptor, computing its signature and selector
    pub fn new(
        name: impl Into<String>,
        args: Vec<MethodArg>,
        returns: Option<AbiType>,
        readonly: bool,
    ) -> Self {
        let name = name.into();
        let signature = signature(&name, &args, returns.as_ref());
        let selector = method_selector(&signature);
        Self {
            name,
            args,
            returns,
            readonly,
            signature,
            selector,
        }
    }

    /// Parse a document entry
    pub fn from_document(doc: &MethodDocument) -> Result<Self, SdkError> {
        let args = doc
            .args
            .iter()
            .map(|arg| {
                Ok(MethodArg {
                    name: arg.name.clone(),
                    abi_type: parse_type(&arg.type_name).map_err(|e| {
                        SdkError::SpecParse(format!("method {}: {}", doc.name, e))
                    })?,
                })
            })
            .collect::<Result<Vec<_>, SdkError>>()?;

        let returns = match doc.returns.type_name.trim() {
            "void" => None,
            other => Some(
                parse_type(other)
                    .map_err(|e| SdkError::SpecParse(format!("method {}: {}", doc.name, e)))?,
            ),
        };

        Ok(Self::new(doc.name.clone(), args, returns, doc.readonly))
    }

    /// Application arguments for a call: `[selector, enc(arg0), enc(arg1), ...]`
    pub fn encode_args(&self, args: &[Token]) -> Result<Vec<Vec<u8>>, SdkError> {
        if args.len() != self.args.len() {
            return Err(SdkError::ArgumentEncoding(format!(
                "{} expects {} arguments, got {}",
                self.name,
                self.args.len(),
                args.len()
            )));
        }

        let mut app_args = Vec::with_capacity(args.len() + 1);
        app_args.push(self.selector.to_vec());
        for (i, (arg, value)) in self.args.iter().zip(args).enumerate() {
            let encoded = encode(&arg.abi_type, value).map_err(|e| {
                SdkError::ArgumentEncoding(format!("{} argument {}: {}", self.name, i, e))
            })?;
            app_args.push(encoded);
        }
        Ok(app_args)
    }

    /// Whether the method returns nothing
    pub fn is_void(&self) -> bool {
        self.returns.is_none()
    }
}

fn signature(name: &str, args: &[MethodArg], returns: Option<&AbiType>) -> String {
    let args: Vec<String> = args.iter().map(|a| a.abi_type.to_string()).collect();
    let ret = returns.map_or_else(|| "void".to_string(), ToString::to_string);
    format!("{}({}){}", name, args.join(","), ret)
}

/// Name-indexed table of method descriptors
#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, MethodSpec>,
    /// Registration order
    order: Vec<String>,
}

impl MethodRegistry {
    /// Merge the methods of all documents
    pub fn from_documents(documents: &[ContractDocument]) -> Result<Self, SdkError> {
        let mut registry = Self::default();
        for doc in documents {
            for method in &doc.methods {
                registry.insert(MethodSpec::from_document(method)?)?;
            }
        }
        Ok(registry)
    }

    /// Parse JSON documents and merge them
    pub fn from_json(documents: &[&str]) -> Result<Self, SdkError> {
        let documents = documents
            .iter()
            .map(|json| {
                serde_json::from_str::<ContractDocument>(json)
                    .map_err(|e| SdkError::SpecParse(format!("invalid contract document: {}", e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_documents(&documents)
    }

    /// ARC200 standard plus extension methods
    pub fn arc200() -> Result<Self, SdkError> {
        Self::from_json(&[ARC200_SPEC, ARC200_EXTENSION_SPEC])
    }

    /// Add one method, rejecting duplicate names
    pub fn insert(&mut self, method: MethodSpec) -> Result<(), SdkError> {
        if self.methods.contains_key(&method.name) {
            return Err(SdkError::SpecParse(format!(
                "duplicate method name: {}",
                method.name
            )));
        }
        self.order.push(method.name.clone());
        self.methods.insert(method.name.clone(), method);
        Ok(())
    }

    /// Look up a method by name
    pub fn get(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.get(name)
    }

    /// Look up a method, failing with `UnknownMethod`
    pub fn require(&self, name: &str) -> Result<&MethodSpec, SdkError> {
        self.get(name)
            .ok_or_else(|| SdkError::UnknownMethod(name.to_string()))
    }

    /// Methods in registration order
    pub fn methods(&self) -> impl Iterator<Item = &MethodSpec> {
        self.order.iter().filter_map(|name| self.methods.get(name))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Number of methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_primitives::Address;

    #[test]
    fn test_arc200_registry() {
        let registry = MethodRegistry::arc200().unwrap();
        assert_eq!(registry.len(), 12);
        assert!(registry.contains("arc200_transfer"));
        assert!(registry.contains("hasAllowance"));
        assert!(registry.contains("touch"));
    }

    #[test]
    fn test_registry_selectors() {
        let registry = MethodRegistry::arc200().unwrap();
        let cases: [(&str, [u8; 4]); 6] = [
            ("arc200_name", [0x65, 0x7d, 0x13, 0xec]),
            ("arc200_decimals", [0x84, 0xec, 0x13, 0xd5]),
            ("arc200_balanceOf", [0x82, 0xe5, 0x73, 0xc4]),
            ("arc200_approve", [0xb5, 0x42, 0x21, 0x25]),
            ("hasBalance", [0xe8, 0xac, 0x57, 0xb8]),
            ("touch", [0xe3, 0x3d, 0x80, 0x52]),
        ];
        for (name, selector) in cases {
            assert_eq!(registry.get(name).unwrap().selector, selector, "{}", name);
        }
    }

    #[test]
    fn test_method_signature_and_flags() {
        let registry = MethodRegistry::arc200().unwrap();
        let transfer = registry.get("arc200_transfer").unwrap();
        assert_eq!(transfer.signature, "arc200_transfer(address,uint256)bool");
        assert!(!transfer.readonly);
        assert_eq!(transfer.args[0].name.as_deref(), Some("to"));

        let name = registry.get("arc200_name").unwrap();
        assert!(name.readonly);
        assert!(name.returns.as_ref().unwrap().is_byte_array());

        assert!(registry.get("touch").unwrap().is_void());
    }

    #[test]
    fn test_methods_in_order() {
        let registry = MethodRegistry::arc200().unwrap();
        let names: Vec<&str> = registry.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"arc200_name"));
        assert_eq!(names.last(), Some(&"touch"));
    }

    #[test]
    fn test_duplicate_across_documents() {
        let result = MethodRegistry::from_json(&[ARC200_SPEC, ARC200_SPEC]);
        assert!(matches!(result, Err(SdkError::SpecParse(_))));
    }

    #[test]
    fn test_duplicate_within_document() {
        let doc = r#"{"name": "x", "methods": [
            {"name": "ping", "args": [], "returns": {"type": "void"}},
            {"name": "ping", "args": [{"type": "uint64"}], "returns": {"type": "void"}}
        ]}"#;
        assert!(matches!(
            MethodRegistry::from_json(&[doc]),
            Err(SdkError::SpecParse(_))
        ));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let doc = r#"{"name": "x", "methods": [
            {"name": "f", "args": [{"type": "int64"}], "returns": {"type": "void"}}
        ]}"#;
        assert!(matches!(
            MethodRegistry::from_json(&[doc]),
            Err(SdkError::SpecParse(_))
        ));
    }

    #[test]
    fn test_oversized_array_type_rejected() {
        let doc = r#"{"name": "x", "methods": [
            {"name": "dump", "readonly": true, "args": [],
             "returns": {"type": "(uint256[1152921504606846976],uint8)"}}
        ]}"#;
        assert!(matches!(
            MethodRegistry::from_json(&[doc]),
            Err(SdkError::SpecParse(_))
        ));

        let doc = r#"{"name": "x", "methods": [
            {"name": "fill", "args": [{"type": "uint256[2048]"}], "returns": {"type": "void"}}
        ]}"#;
        assert!(matches!(
            MethodRegistry::from_json(&[doc]),
            Err(SdkError::SpecParse(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            MethodRegistry::from_json(&["{not json"]),
            Err(SdkError::SpecParse(_))
        ));
    }

    #[test]
    fn test_require_unknown() {
        let registry = MethodRegistry::arc200().unwrap();
        assert!(matches!(
            registry.require("arc200_mint"),
            Err(SdkError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_encode_args() {
        let registry = MethodRegistry::arc200().unwrap();
        let transfer = registry.get("arc200_transfer").unwrap();
        let to = Address::from_bytes([4u8; 32]);
        let app_args = transfer
            .encode_args(&[Token::Address(to), Token::uint(100)])
            .unwrap();
        assert_eq!(app_args.len(), 3);
        assert_eq!(app_args[0], vec![0xda, 0x70, 0x25, 0xb9]);
        assert_eq!(app_args[1], vec![4u8; 32]);
        assert_eq!(app_args[2].len(), 32);
        assert_eq!(app_args[2][31], 100);
    }

    #[test]
    fn test_encode_args_wrong_count() {
        let registry = MethodRegistry::arc200().unwrap();
        let transfer = registry.get("arc200_transfer").unwrap();
        assert!(matches!(
            transfer.encode_args(&[Token::uint(100)]),
            Err(SdkError::ArgumentEncoding(_))
        ));
    }

    #[test]
    fn test_encode_args_wrong_type() {
        let registry = MethodRegistry::arc200().unwrap();
        let balance_of = registry.get("arc200_balanceOf").unwrap();
        assert!(matches!(
            balance_of.encode_args(&[Token::string("not an address")]),
            Err(SdkError::ArgumentEncoding(_))
        ));
    }
}
