//! Tests for encrypted CRF files
//!
//! These tests verify:
//! - Write/read round trip through the AES-256-GCM envelope
//! - Wrong key and ciphertext tampering surface as decryption errors
//! - Plaintext tampering re-encrypted under the right key surfaces as integrity errors
//! - Metadata-only reads and index lookups
//! - Pluggable envelopes and key sources

use std::fs;
use std::path::PathBuf;

use crfile::container::{checksum, footer_bytes, CHECKSUM_SIZE, FOOTER_SIZE};
use crfile::envelope::{AesGcmEnvelope, Envelope};
use crfile::{
    generate_key, identifier_hash, read_file, read_file_metadata, write_file, Config, CrfError,
    CrfKey, CrfStore, ErrorKind, IntegrityFailure, PlaintextRecord, Result,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sample.crf");
    (temp_dir, path)
}

fn example_record() -> PlaintextRecord {
    PlaintextRecord::new("111-111-111", "A", "X", 500)
        .with_flags(0)
        .with_sub_account("Chequing", 100)
        .with_sub_account("LOC", -200)
}

fn sample_records() -> Vec<PlaintextRecord> {
    vec![
        PlaintextRecord::new("111-222-333", "David Chen", "483 University Dr, Calgary, AB", 670)
            .with_flags(3)
            .with_sub_account("Chequing", 500)
            .with_sub_account("Credit Card", -8000),
        PlaintextRecord::new("123456789", "Samantha Liu", "64 North St, North Pole", 710)
            .with_flags(1)
            .with_sub_account("Chequing", 3000)
            .with_sub_account("Savings", 12000)
            .with_sub_account("Auto Loan", -1_500_000),
    ]
}

fn unsynced_store(key: &CrfKey) -> CrfStore {
    let config = Config::builder().sync_on_write(false).build();
    CrfStore::with_key(config, key).unwrap()
}

/// Decrypt the file, let `edit` modify the plaintext, and re-encrypt it under the same key
fn tamper_plaintext(path: &PathBuf, key: &CrfKey, edit: impl FnOnce(&mut Vec<u8>)) {
    let envelope = AesGcmEnvelope::new(key);
    let mut plaintext = envelope.open(&fs::read(path).unwrap()).unwrap();
    edit(&mut plaintext);
    fs::write(path, envelope.seal(&plaintext).unwrap()).unwrap();
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_example_record_round_trip() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();

    write_file(&path, &[example_record()], &key).unwrap();
    let records = read_file(&path, &key).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.identifier_hash, identifier_hash("111-111-111"));
    assert_eq!(record.name, "A");
    assert_eq!(record.address, "X");
    assert_eq!(record.credit_score, 500);
    assert_eq!(record.flags, 0);
    let balances: Vec<i32> = record.sub_accounts.iter().map(|a| a.balance).collect();
    assert_eq!(balances, vec![100, -200]);
    assert_eq!(record.sub_accounts[0].name, "Chequing");
    assert_eq!(record.sub_accounts[1].name, "LOC");
}

#[test]
fn test_round_trip_preserves_order_and_fields() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let store = unsynced_store(&key);
    let records = sample_records();

    store.write(&path, &records).unwrap();
    let decoded = store.read(&path).unwrap();

    assert_eq!(decoded.len(), records.len());
    for (original, decoded) in records.iter().zip(&decoded) {
        assert_eq!(decoded.identifier_hash, identifier_hash(&original.identifier));
        assert_eq!(decoded.name, original.name);
        assert_eq!(decoded.address, original.address);
        assert_eq!(decoded.credit_score, original.credit_score);
        assert_eq!(decoded.flags, original.flags);
        assert_eq!(decoded.sub_accounts, original.sub_accounts);
    }
}

#[test]
fn test_negative_balance_is_not_wrapped() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let record = PlaintextRecord::new("987-654-321", "J", "Y", 500).with_sub_account("LOC", -5000);

    write_file(&path, &[record], &key).unwrap();
    let decoded = read_file(&path, &key).unwrap();
    assert_eq!(decoded[0].sub_accounts[0].balance, -5000);
}

#[test]
fn test_empty_file_round_trip() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();

    write_file(&path, &[], &key).unwrap();
    assert!(read_file(&path, &key).unwrap().is_empty());
    assert_eq!(read_file_metadata(&path, &key).unwrap().record_count, 0);
}

#[test]
fn test_file_does_not_contain_plaintext() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    write_file(&path, &sample_records(), &key).unwrap();

    let raw = fs::read(&path).unwrap();
    for needle in [&b"CRF_END"[..], b"Samantha Liu", b"111-222-333"] {
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
    }
}

#[test]
fn test_overwrite_replaces_previous_file() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let store = unsynced_store(&key);

    store.write(&path, &sample_records()).unwrap();
    store.write(&path, &[example_record()]).unwrap();
    assert_eq!(store.read(&path).unwrap().len(), 1);
}

// =============================================================================
// Metadata / Lookup Tests
// =============================================================================

#[test]
fn test_read_metadata() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    write_file(&path, &sample_records(), &key).unwrap();

    let metadata = read_file_metadata(&path, &key).unwrap();
    assert_eq!(metadata.format_version, 2);
    assert_eq!(metadata.record_count, 2);
}

#[test]
fn test_metadata_still_requires_correct_key() {
    let (_temp, path) = setup_temp_file();
    write_file(&path, &sample_records(), &generate_key()).unwrap();

    let err = read_file_metadata(&path, &generate_key()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decryption);
}

#[test]
fn test_version_one_files() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let config = Config::builder().format_version(1).sync_on_write(false).build();
    let store = CrfStore::with_key(config, &key).unwrap();

    store.write(&path, &sample_records()).unwrap();
    assert_eq!(store.read_metadata(&path).unwrap().format_version, 1);
    // the default reader accepts both versions
    assert_eq!(read_file(&path, &key).unwrap().len(), 2);
}

#[test]
fn test_lookup_through_store() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let store = unsynced_store(&key);
    store.write(&path, &sample_records()).unwrap();

    let found = store.lookup(&path, "123456789").unwrap().unwrap();
    assert_eq!(found.name, "Samantha Liu");
    assert_eq!(found.sub_accounts[2].balance, -1_500_000);
    assert!(store.lookup(&path, "no-such-id").unwrap().is_none());
}

// =============================================================================
// Decryption Failure Tests
// =============================================================================

#[test]
fn test_wrong_key_is_decryption_error() {
    let (_temp, path) = setup_temp_file();
    write_file(&path, &sample_records(), &generate_key()).unwrap();

    for _ in 0..5 {
        let err = read_file(&path, &generate_key()).unwrap_err();
        assert!(matches!(err, CrfError::Decryption(_)), "got {:?}", err);
    }
}

#[test]
fn test_any_ciphertext_flip_is_decryption_error() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    write_file(&path, &[example_record()], &key).unwrap();
    let clean = fs::read(&path).unwrap();

    for pos in (0..clean.len()).step_by(7).chain([clean.len() - 1]) {
        let mut tampered = clean.clone();
        tampered[pos] ^= 0x01;
        fs::write(&path, &tampered).unwrap();

        let err = read_file(&path, &key).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decryption, "flip at {}", pos);
    }
}

#[test]
fn test_truncated_ciphertext_is_decryption_error() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    write_file(&path, &sample_records(), &key).unwrap();

    let raw = fs::read(&path).unwrap();
    fs::write(&path, &raw[..raw.len() / 2]).unwrap();
    assert_eq!(read_file(&path, &key).unwrap_err().kind(), ErrorKind::Decryption);
}

// =============================================================================
// Integrity Failure Tests (re-encrypted plaintext)
// =============================================================================

#[test]
fn test_footer_and_checksum_flips_are_integrity_errors() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let store = unsynced_store(&key);

    for offset in 0..FOOTER_SIZE + CHECKSUM_SIZE {
        store.write(&path, &sample_records()).unwrap();
        tamper_plaintext(&path, &key, |plaintext| {
            let pos = plaintext.len() - FOOTER_SIZE - CHECKSUM_SIZE + offset;
            plaintext[pos] ^= 0x04;
        });

        let err = store.read(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity, "flip at trailer byte {}", offset);
    }
}

#[test]
fn test_count_mismatch_through_store() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let store = unsynced_store(&key);
    store.write(&path, &sample_records()).unwrap();

    tamper_plaintext(&path, &key, |plaintext| {
        let start = plaintext.len() - FOOTER_SIZE - CHECKSUM_SIZE;
        let footer = footer_bytes(7);
        plaintext.truncate(start);
        plaintext.extend_from_slice(&footer);
        plaintext.extend_from_slice(&checksum(&footer).to_le_bytes());
    });

    let err = store.read(&path).unwrap_err();
    assert!(matches!(
        err,
        CrfError::Integrity(IntegrityFailure::RecordCountMismatch { header: 2, footer: 7 })
    ));
}

#[test]
fn test_bad_magic_after_decryption_is_format_error() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    write_file(&path, &sample_records(), &key).unwrap();

    tamper_plaintext(&path, &key, |plaintext| plaintext[0] = b'Z');
    assert_eq!(read_file(&path, &key).unwrap_err().kind(), ErrorKind::Format);
}

// =============================================================================
// Configuration / Envelope / Key Source Tests
// =============================================================================

/// Reversible test double: no cryptography, just proves the stage is pluggable
struct XorEnvelope(u8);

impl Envelope for XorEnvelope {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.iter().map(|b| b ^ self.0).collect())
    }

    fn open(&self, token: &[u8]) -> Result<Vec<u8>> {
        Ok(token.iter().map(|b| b ^ self.0).collect())
    }
}

#[test]
fn test_custom_envelope() {
    let (_temp, path) = setup_temp_file();
    let config = Config::builder().sync_on_write(false).build();
    let store = CrfStore::with_envelope(config, XorEnvelope(0x5A)).unwrap();

    store.write(&path, &sample_records()).unwrap();
    let raw = fs::read(&path).unwrap();
    assert_eq!(raw[0] ^ 0x5A, b'C');
    assert_eq!(store.read(&path).unwrap().len(), 2);
}

#[test]
fn test_invalid_config_rejected() {
    let config = Config::builder().format_version(9).build();
    let err = CrfStore::with_key(config, &generate_key()).unwrap_err();
    assert!(matches!(err, CrfError::Config(_)));
}

#[test]
fn test_max_file_size_enforced_before_decrypting() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    write_file(&path, &sample_records(), &key).unwrap();

    let config = Config::builder().max_file_size(16).build();
    let store = CrfStore::with_key(config, &key).unwrap();
    assert!(matches!(store.read(&path), Err(CrfError::Capacity(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let (_temp, path) = setup_temp_file();
    let err = read_file(&path, &generate_key()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_store_from_key_source() {
    let (_temp, path) = setup_temp_file();
    let key = generate_key();
    let config = Config::builder().sync_on_write(false).build();
    let store = CrfStore::from_key_source(config, &key).unwrap();

    store.write(&path, &[example_record()]).unwrap();
    assert_eq!(read_file(&path, &key).unwrap().len(), 1);
}
