use medrep_backend::util::password::*;

#[test]
fn test_hash_password_success() {
    let password = "test_password_123";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(hash.starts_with("$argon2"));
}

#[test]
fn test_hash_password_different_results() {
    // Fresh random salt per hash; equal passwords never share a hash.
    let password = "same_password";
    let hash1 = PasswordUtilsImpl::hash_password(password).unwrap();
    let hash2 = PasswordUtilsImpl::hash_password(password).unwrap();
    assert_ne!(hash1, hash2);
}

#[test]
fn test_verify_password_correct() {
    let password = "correct_horse_battery_staple";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();
    assert!(PasswordUtilsImpl::verify_password(password, &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = PasswordUtilsImpl::hash_password("right_password").unwrap();
    assert!(!PasswordUtilsImpl::verify_password("wrong_password", &hash).unwrap());
}

#[test]
fn test_verify_password_unicode() {
    let password = "Pássw0rd123!🔒";
    let hash = PasswordUtilsImpl::hash_password(password).unwrap();
    assert!(PasswordUtilsImpl::verify_password(password, &hash).unwrap());
}

#[test]
fn test_verify_password_invalid_hash_format() {
    let result = PasswordUtilsImpl::verify_password("whatever", "not-a-phc-string");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}
