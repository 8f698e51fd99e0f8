//! End-to-end wallet flows across keys, addresses and scanning

use crate::*;
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::scalar::Scalar as DalekScalar;
use xmrkit_crypto::keccak256;

#[test]
fn test_full_payment_flow() {
    // 1. Recipient restores a wallet from its mnemonic
    let recipient = KeyPair::generate();
    let phrase = recipient.to_mnemonic("English").unwrap().phrase();
    let restored = KeyPair::from_mnemonic(&Mnemonic::from_phrase(&phrase).unwrap()).unwrap();
    assert_eq!(restored, recipient);
    let wallet = restored.account();

    // 2. Recipient hands out an integrated address
    let config = Network::Stagenet.config();
    let payment_id = PaymentId::generate();
    let text = wallet.integrated_address(&config, payment_id).encode();

    // 3. Sender parses it and builds two outputs plus an encrypted payment id
    let address = Address::parse(&text, &config).unwrap();
    let r = PrivateKey::generate();
    let derivation = generate_key_derivation(address.view_public(), &r);
    let outputs = vec![
        derive_public_key(&derivation, 0, address.spend_public()),
        derive_public_key(&derivation, 1, address.spend_public()),
    ];
    let encrypted_id = stealth_payment_id(&payment_id, address.view_public(), &r);

    // 4. Recipient scans with its view key and decrypts the payment id
    let tx_public = r.public_key();
    let owned = scan_outputs(
        &outputs,
        &tx_public,
        &wallet.view_secret,
        &wallet.spend_public,
        Some(&wallet.spend_secret),
    );
    assert_eq!(owned.len(), 2);
    for output in &owned {
        assert!(is_output_mine(
            &tx_public,
            &wallet.view_secret,
            &wallet.spend_public,
            output.output_index,
            &output.output_key
        ));
        assert_eq!(output.one_time_secret.unwrap().public_key(), output.output_key);
    }
    assert_eq!(
        stealth_payment_id(&encrypted_id, &tx_public, &wallet.view_secret),
        payment_id
    );
}

#[test]
fn test_one_time_key_matches_reference() {
    let wallet = KeyPair::from_seed(&[0x0d; 32]).account();
    let r = PrivateKey::from_bytes_mod_order(&[0xe1; 32]);
    let derivation = generate_key_derivation(&wallet.view_public, &r);
    let ours = derive_public_key(&derivation, 7, &wallet.spend_public);

    let mut data = derivation.as_bytes().to_vec();
    data.push(7);
    let s = DalekScalar::from_bytes_mod_order(keccak256(&data));
    let b = CompressedEdwardsY(*wallet.spend_public.as_bytes()).decompress().unwrap();
    let expected = (b + ED25519_BASEPOINT_POINT * s).compress().to_bytes();
    assert_eq!(ours.as_bytes(), &expected);
}

#[test]
fn test_subaddress_payment_flow() {
    let wallet = KeyPair::from_seed(&[0x5e; 32]).account();
    let config = Network::Testnet.config();
    let index = SubaddressIndex::new(0, 3);
    let text = wallet.subaddress(&config, index).encode();

    // Sender to a subaddress: R = r*D, derivation from (C, r)
    let address = Address::parse(&text, &config).unwrap();
    assert_eq!(address.kind(&config), Some(AddressKind::Subaddress));
    let r = PrivateKey::generate();
    let tx_public = PublicKey::from_point(&address.spend_public().point().mul_scalar(r.as_scalar()));
    let derivation = generate_key_derivation(address.view_public(), &r);
    let output = derive_public_key(&derivation, 0, address.spend_public());

    let table = SubaddressTable::generate(&wallet.spend_public, &wallet.view_secret, 0..1, 0..10);
    let owned = scan_outputs_with_subaddresses(&[output], &tx_public, &table, Some(&wallet.spend_secret));
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].subaddress, index);
    assert_eq!(owned[0].one_time_secret.unwrap().public_key(), output);

    // The primary address alone does not see it
    assert!(!is_output_mine(&tx_public, &wallet.view_secret, &wallet.spend_public, 0, &output));
}

#[test]
fn test_address_record_for_every_kind() {
    let wallet = KeyPair::from_seed(&[0x2a; 32]).account();
    let config = NetworkConfig::default();
    let addresses = [
        (wallet.address(&config), AddressKind::Standard),
        (wallet.integrated_address(&config, PaymentId::from_bytes([4; 8])), AddressKind::Integrated),
        (wallet.subaddress(&config, (3, 4).into()), AddressKind::Subaddress),
    ];

    for (address, kind) in addresses {
        let parsed = Address::parse(&address.encode(), &config).unwrap();
        let record = parsed.record(parsed.kind(&config).unwrap());
        assert_eq!(record.kind, kind);
        assert_eq!(record.address, address.encode());
        assert_eq!(record.network_byte, config.tag(kind));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<AddressRecord>(&json).unwrap(), record);
    }
}

const PUBLISHED_PHRASE: &str = "velvet lymph giddy number token physics poetry unquoted nibs useful \
    sabotage limits benches lifestyle eden nitrogen anvil fewest avoid batch vials washing fences goat unquoted";
const PUBLISHED_ADDRESS: &str =
    "42ey1afDFnn4886T7196doS9GPMzexD9gXpsZJDwVjeRVdFCSoHnv7KPbBeGpzJBzHRCAs9UxqeoyFQMYbqSWYTfJJQAWDm";

fn published_wallet() -> AccountKeys {
    let mnemonic = Mnemonic::from_phrase(PUBLISHED_PHRASE).unwrap();
    KeyPair::from_mnemonic(&mnemonic).unwrap().account()
}

#[test]
fn test_published_wallet_keys() {
    let mnemonic = Mnemonic::from_phrase(PUBLISHED_PHRASE).unwrap();
    assert_eq!(mnemonic.language(), "English");
    assert_eq!(mnemonic.phrase(), PUBLISHED_PHRASE);

    let wallet = published_wallet();
    assert_eq!(
        wallet.spend_secret.to_hex(),
        "148d78d2aba7dbca5cd8f6abcfb0b3c009ffbdbea1ff373d50ed94d78286640e"
    );
    assert_eq!(
        wallet.view_secret.to_hex(),
        "49774391fa5e8d249fc2c5b45dadef13534bf2483dede880dac88f061e809100"
    );
    assert_eq!(
        wallet.spend_public.to_hex(),
        "1b3bd040020d3712ab84992b773d0a965134eb2df0392fb84af95de8a17be2ab"
    );
    assert_eq!(
        wallet.view_public.to_hex(),
        "231c9bf8341c6a870d92e3fb98063a90a355fb8dbf74a8561b9d7f9273247e99"
    );
    assert_eq!(wallet.address(&Network::Mainnet.config()).encode(), PUBLISHED_ADDRESS);
    assert_eq!(wallet.spend_secret.to_bytes().to_vec(), mnemonic.seed());
}

#[test]
fn test_decode_published_addresses() {
    let wallet = published_wallet();
    let config = Network::Mainnet.config();

    let standard = Address::parse(PUBLISHED_ADDRESS, &config).unwrap();
    assert_eq!(standard.kind(&config), Some(AddressKind::Standard));
    assert_eq!(standard.spend_public(), &wallet.spend_public);
    assert_eq!(standard.view_public(), &wallet.view_public);

    let integrated = "4CMe2PUhs4J4886T7196doS9GPMzexD9gXpsZJDwVjeRVdFCSoHnv7KPbBeGpzJBzHRCAs9UxqeoyFQMYbqSWYTfSbyvqonpbf2Tzcs8kx";
    let address = Address::parse(integrated, &config).unwrap();
    assert_eq!(address.kind(&config), Some(AddressKind::Integrated));
    assert_eq!(address.payment_id().map(PaymentId::to_hex).as_deref(), Some("1234567890abcdef"));
    assert_eq!(address.to_standard(&config).encode(), PUBLISHED_ADDRESS);

    let subaddresses = [
        (
            SubaddressIndex::new(0, 1),
            "84QRUYawRNrU3NN1VpFRndSukeyEb3Xpv8qZjjsoJZnTYpDYceuUTpog13D7qPxpviS7J29bSgSkR11hFFoXWk2yNdsR9WF",
            "337d469a9937f3a1aaa4d3a4f108d69ae727cff85a18232edb33f091ce9914be",
        ),
        (
            SubaddressIndex::new(1, 0),
            "82pP87g1Vkd3LUMssBCumk3MfyEsFqLAaGDf6oxddu61EgSFzt8gCwUD4tr3kp9TUfdPs2CnpD7xLZzyC1Ei9UsW3oyCWDf",
            "099d1074d250c20df6dfe2232ecc8b0e168b82fad7c6b75afbdac7870d23b251",
        ),
    ];
    for (index, text, spend) in subaddresses {
        let address = Address::parse(text, &config).unwrap();
        assert_eq!(address.kind(&config), Some(AddressKind::Subaddress));
        assert_eq!(address.spend_public().to_hex(), spend);
        assert_eq!(wallet.subaddress(&config, index), address);
    }
}
