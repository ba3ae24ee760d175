
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use passcache::cache::{CacheLookup, CacheSettings, PassphraseCache};
use passcache::crypto::CacheKey;
use passcache::errors::CacheError;
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;
use test_helpers::{cache_in, cache_path};

fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string())
}

#[test]
fn test_store_then_retrieve_before_expiry() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));

    let before = chrono::Utc::now();
    let expires_at = cache.store(&secret("correct horse battery staple")).unwrap();
    let after = chrono::Utc::now();

    assert!(expires_at >= before + chrono::Duration::seconds(60));
    assert!(expires_at <= after + chrono::Duration::seconds(60));

    match cache.retrieve().unwrap() {
        CacheLookup::Valid {
            passphrase,
            expires_at: read_back,
        } => {
            assert_eq!(passphrase.expose_secret(), "correct horse battery staple");
            assert_eq!(read_back, expires_at);
        }
        other => panic!("expected a valid record, got {:?}", other),
    }
}

#[test]
fn test_short_lived_passphrase_expires() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(2));

    cache.store(&secret("correct horse battery staple")).unwrap();
    assert_eq!(
        cache.lookup().unwrap().expose_secret(),
        "correct horse battery staple"
    );

    thread::sleep(Duration::from_secs(3));

    assert!(matches!(
        cache.retrieve().unwrap(),
        CacheLookup::Expired { .. }
    ));
    assert!(cache.lookup().is_none());
    // Reading an expired record leaves the file in place.
    assert!(cache_path(&dir).exists());
}

#[test]
fn test_store_replaces_previous_passphrase() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));

    cache.store(&secret("first")).unwrap();
    cache.store(&secret("second")).unwrap();

    assert_eq!(cache.lookup().unwrap().expose_secret(), "second");
}

#[test]
fn test_store_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let cache = PassphraseCache::new(CacheSettings {
        path: dir.path().join("nested").join("deeper").join("passphrase.cache"),
        ttl: Duration::from_secs(60),
    });

    cache.store(&secret("hunter2")).unwrap();

    assert_eq!(cache.lookup().unwrap().expose_secret(), "hunter2");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));

    let err = cache.retrieve().unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_integrity_failure());
    assert!(cache.lookup().is_none());
}

#[test]
fn test_tampered_ciphertext_is_rejected() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));
    cache.store(&secret("hunter2")).unwrap();

    let contents = fs::read_to_string(cache_path(&dir)).unwrap();
    let mut raw = STANDARD.decode(contents.trim()).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;
    fs::write(cache_path(&dir), STANDARD.encode(&raw)).unwrap();

    let err = cache.retrieve().unwrap_err();
    assert!(matches!(err, CacheError::Integrity));
    assert!(cache.lookup().is_none());
}

#[test]
fn test_garbage_file_is_untrusted() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));

    fs::write(cache_path(&dir), "this is not a cache file").unwrap();
    assert!(cache.retrieve().unwrap_err().is_integrity_failure());

    fs::write(cache_path(&dir), "").unwrap();
    assert!(cache.retrieve().unwrap_err().is_integrity_failure());
}

#[test]
fn test_file_sealed_under_other_key_is_rejected() {
    let dir = tempdir().unwrap();
    let settings = CacheSettings {
        path: cache_path(&dir),
        ttl: Duration::from_secs(60),
    };
    PassphraseCache::with_key(settings.clone(), CacheKey::from_seed(b"another machine"))
        .store(&secret("hunter2"))
        .unwrap();

    let err = PassphraseCache::new(settings).retrieve().unwrap_err();

    assert!(matches!(err, CacheError::Integrity));
}

#[test]
fn test_cache_file_does_not_contain_plaintext() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));
    cache.store(&secret("correct horse battery staple")).unwrap();

    let contents = fs::read(cache_path(&dir)).unwrap();
    let text = String::from_utf8_lossy(&contents);

    assert!(!text.contains("correct horse"));
    assert!(!text.contains("expires_at"));
}

#[test]
fn test_invalidate_is_idempotent() {
    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));
    cache.store(&secret("hunter2")).unwrap();

    assert!(cache.invalidate().unwrap());
    assert!(!cache.invalidate().unwrap());
    assert!(cache.retrieve().unwrap_err().is_not_found());
}

#[test]
fn test_cache_is_shared_between_instances() {
    let dir = tempdir().unwrap();
    cache_in(&dir, Duration::from_secs(60))
        .store(&secret("hunter2"))
        .unwrap();

    let other = cache_in(&dir, Duration::from_secs(5));

    assert_eq!(other.lookup().unwrap().expose_secret(), "hunter2");
}

#[cfg(unix)]
#[test]
fn test_cache_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let cache = cache_in(&dir, Duration::from_secs(60));
    cache.store(&secret("hunter2")).unwrap();

    let mode = fs::metadata(cache_path(&dir)).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
