//! Property tests for the ABI codec

use arc_sdk::abi::{decode, encode, method_selector, parse_type, AbiType, Token};
use arc_sdk::{Address, U256};
use proptest::prelude::*;

fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(Address::from_bytes)
}

fn leaf_type() -> impl Strategy<Value = AbiType> {
    prop_oneof![
        (1usize..=32).prop_map(|n| AbiType::Uint(n * 8)),
        (1usize..=32, 1usize..=160).prop_map(|(n, m)| AbiType::UFixed(n * 8, m)),
        Just(AbiType::Byte),
        Just(AbiType::Bool),
        Just(AbiType::Address),
        Just(AbiType::String),
    ]
}

fn abi_type() -> impl Strategy<Value = AbiType> {
    leaf_type().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            (inner.clone(), 1usize..4).prop_map(|(t, n)| AbiType::StaticArray(Box::new(t), n)),
            (Just(AbiType::Bool), 1usize..20).prop_map(|(t, n)| AbiType::StaticArray(Box::new(t), n)),
            inner.clone().prop_map(|t| AbiType::DynamicArray(Box::new(t))),
            prop::collection::vec(inner, 0..6).prop_map(AbiType::Tuple),
        ]
    })
}

/// Values of `abi_type`, sized to stay well inside 16-bit offsets
fn value_of(abi_type: &AbiType) -> BoxedStrategy<Token> {
    match abi_type {
        AbiType::Uint(bits) | AbiType::UFixed(bits, _) => {
            let unused = 32 - bits / 8;
            any::<[u8; 32]>()
                .prop_map(move |mut bytes| {
                    bytes[..unused].fill(0);
                    Token::Uint(U256::from_big_endian(&bytes))
                })
                .boxed()
        }
        AbiType::Byte => any::<u8>().prop_map(Token::Byte).boxed(),
        AbiType::Bool => any::<bool>().prop_map(Token::Bool).boxed(),
        AbiType::Address => address().prop_map(Token::Address).boxed(),
        AbiType::String => ".{0,8}".prop_map(Token::String).boxed(),
        AbiType::StaticArray(inner, len) => prop::collection::vec(value_of(inner), *len)
            .prop_map(Token::Array)
            .boxed(),
        AbiType::DynamicArray(inner) => prop::collection::vec(value_of(inner), 0..4)
            .prop_map(Token::Array)
            .boxed(),
        AbiType::Tuple(types) => types
            .iter()
            .map(value_of)
            .collect::<Vec<_>>()
            .prop_map(Token::Tuple)
            .boxed(),
    }
}

fn typed_value() -> impl Strategy<Value = (AbiType, Token)> {
    abi_type().prop_flat_map(|t| {
        let value = value_of(&t);
        (Just(t), value)
    })
}

// ==================== Scalar Tests ====================

proptest! {
    #[test]
    fn prop_uint64_roundtrip(value in any::<u64>()) {
        let encoded = encode(&AbiType::Uint(64), &Token::uint(value)).unwrap();
        prop_assert_eq!(encoded.len(), 8);
        prop_assert_eq!(decode(&AbiType::Uint(64), &encoded).unwrap(), Token::uint(value));
    }

    #[test]
    fn prop_uint256_is_big_endian(value in any::<u64>()) {
        let encoded = encode(&AbiType::Uint(256), &Token::uint(value)).unwrap();
        prop_assert_eq!(encoded.len(), 32);
        prop_assert!(encoded[..24].iter().all(|b| *b == 0));
        prop_assert_eq!(&encoded[24..], &value.to_be_bytes()[..]);
    }

    #[test]
    fn prop_uint8_rejects_overflow(value in 256u64..=u64::MAX) {
        prop_assert!(encode(&AbiType::Uint(8), &Token::uint(value)).is_err());
    }

    #[test]
    fn prop_string_roundtrip(s in ".{0,64}") {
        let encoded = encode(&AbiType::String, &Token::string(s.clone())).unwrap();
        prop_assert_eq!(encoded.len(), 2 + s.len());
        prop_assert_eq!(decode(&AbiType::String, &encoded).unwrap(), Token::string(s));
    }

    #[test]
    fn prop_decode_rejects_trailing_bytes(value in any::<u64>(), extra in 1usize..8) {
        let mut encoded = encode(&AbiType::Uint(64), &Token::uint(value)).unwrap();
        encoded.extend(std::iter::repeat(0u8).take(extra));
        prop_assert!(decode(&AbiType::Uint(64), &encoded).is_err());
    }
}

// ==================== Composite Tests ====================

proptest! {
    #[test]
    fn prop_transfer_args_tuple(to in address(), amount in any::<u64>()) {
        let ty = parse_type("(address,uint256)").unwrap();
        let token = Token::Tuple(vec![Token::Address(to), Token::Uint(U256::from(amount))]);
        let encoded = encode(&ty, &token).unwrap();
        prop_assert_eq!(encoded.len(), 64);
        prop_assert_eq!(decode(&ty, &encoded).unwrap(), token);
    }

    #[test]
    fn prop_dynamic_tuple_roundtrip(a in any::<u16>(), s in "[a-z]{0,16}", items in prop::collection::vec(any::<u32>(), 0..6)) {
        let ty = parse_type("(uint16,string,uint32[])").unwrap();
        let token = Token::Tuple(vec![
            Token::uint(a as u64),
            Token::string(s),
            Token::Array(items.into_iter().map(|v| Token::uint(v as u64)).collect()),
        ]);
        let encoded = encode(&ty, &token).unwrap();
        prop_assert_eq!(decode(&ty, &encoded).unwrap(), token);
    }

    #[test]
    fn prop_static_array_length_checked(items in prop::collection::vec(any::<u8>(), 0..8)) {
        let ty = parse_type("byte[4]").unwrap();
        let token = Token::Array(items.iter().copied().map(Token::Byte).collect());
        prop_assert_eq!(encode(&ty, &token).is_ok(), items.len() == 4);
    }
}

// ==================== Any-Type Tests ====================

proptest! {
    #[test]
    fn prop_any_type_roundtrip((t, value) in typed_value()) {
        let encoded = encode(&t, &value).unwrap();
        if let Some(size) = t.static_size() {
            prop_assert_eq!(encoded.len(), size);
        }
        prop_assert_eq!(decode(&t, &encoded).unwrap(), value);
    }

    #[test]
    fn prop_any_type_descriptor_roundtrip(t in abi_type()) {
        prop_assert_eq!(parse_type(&t.to_string()).unwrap(), t);
    }

    #[test]
    fn prop_bool_runs_roundtrip(bools in prop::collection::vec(any::<bool>(), 0..20), tag in any::<u8>()) {
        // bools broken up by a byte, so runs on either side pack separately
        let mut types = vec![AbiType::Bool; bools.len()];
        types.push(AbiType::Byte);
        types.extend(vec![AbiType::Bool; bools.len()]);
        let mut tokens: Vec<Token> = bools.iter().copied().map(Token::Bool).collect();
        tokens.push(Token::Byte(tag));
        tokens.extend(bools.iter().copied().map(Token::Bool));

        let tuple = AbiType::Tuple(types);
        let encoded = encode(&tuple, &Token::Tuple(tokens.clone())).unwrap();
        prop_assert_eq!(encoded.len(), 2 * bools.len().div_ceil(8) + 1);
        prop_assert_eq!(decode(&tuple, &encoded).unwrap(), Token::Tuple(tokens));

        let array = Token::Array(bools.iter().copied().map(Token::Bool).collect());
        let dynamic = AbiType::DynamicArray(Box::new(AbiType::Bool));
        let encoded = encode(&dynamic, &array).unwrap();
        prop_assert_eq!(encoded.len(), 2 + bools.len().div_ceil(8));
        prop_assert_eq!(decode(&dynamic, &encoded).unwrap(), array);
    }
}

#[test]
fn test_bool_run_packing_boundary() {
    let t = parse_type("bool[9]").unwrap();
    let value = Token::Array((0..9).map(|i| Token::Bool(i % 4 == 0)).collect());
    let encoded = encode(&t, &value).unwrap();
    // bits 0, 4 in the first byte; bit 8 opens the second
    assert_eq!(encoded, vec![0x88, 0x80]);
    assert_eq!(decode(&t, &encoded).unwrap(), value);
    assert!(decode(&t, &[0x88, 0x81]).is_err());
}

// ==================== Selector Tests ====================

proptest! {
    #[test]
    fn prop_selector_deterministic(name in "[a-zA-Z_][a-zA-Z0-9_]{0,24}") {
        let signature = format!("{}(address,uint256)bool", name);
        prop_assert_eq!(method_selector(&signature), method_selector(&signature));
    }

    #[test]
    fn prop_type_display_roundtrip(bits in 1usize..=32, len in 1usize..5) {
        for descriptor in [
            format!("uint{}", bits * 8),
            format!("uint{}[{}]", bits * 8, len),
            format!("(address,uint{}[],string)", bits * 8),
        ] {
            let ty = parse_type(&descriptor).unwrap();
            prop_assert_eq!(ty.to_string(), descriptor);
        }
    }
}

#[test]
fn test_known_selectors() {
    assert_eq!(method_selector("add(uint64,uint64)uint128"), [0x8a, 0xa3, 0xb6, 0x1f]);
    assert_eq!(
        method_selector("arc200_transfer(address,uint256)bool"),
        [0xda, 0x70, 0x25, 0xb9]
    );
}
