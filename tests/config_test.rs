// ABOUTME: Integration tests for environment-driven configuration loading

use serial_test::serial;
use std::env;
use talentgate_iam::config::{AuthConfig, JwtConfig, OtpConfig};

fn clear_auth_env() {
    for key in [
        "JWT_SECRET",
        "JWT_ACCESS_TTL_MINUTES",
        "JWT_REFRESH_TTL_DAYS",
        "JWT_ISSUER",
        "JWT_AUDIENCE",
        "OTP_CODE_LENGTH",
        "OTP_MAX_ATTEMPTS",
        "OTP_EXPIRY_MINUTES",
        "OTP_RATE_LIMIT_SECONDS",
        "REDIS_URL",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_jwt_secret_is_required() {
    clear_auth_env();
    assert!(JwtConfig::from_env().is_err());

    env::set_var("JWT_SECRET", "");
    assert!(JwtConfig::from_env().is_err());

    env::set_var("JWT_SECRET", "unit-test-secret");
    let cfg = JwtConfig::from_env().unwrap();
    assert_eq!(cfg.secret, "unit-test-secret");
    assert_eq!(cfg.issuer, "talentgate");
    clear_auth_env();
}

#[test]
#[serial]
fn test_env_overrides_apply() {
    clear_auth_env();
    env::set_var("JWT_SECRET", "s");
    env::set_var("JWT_ACCESS_TTL_MINUTES", "30");
    env::set_var("OTP_CODE_LENGTH", "8");
    env::set_var("OTP_MAX_ATTEMPTS", "3");

    let cfg = AuthConfig::from_env().unwrap();
    assert_eq!(cfg.jwt.access_token_ttl_minutes, 30);
    assert_eq!(cfg.otp.code_length, 8);
    assert_eq!(cfg.otp.max_attempts, 3);
    clear_auth_env();
}

#[test]
#[serial]
fn test_unparsable_values_fall_back_to_defaults() {
    clear_auth_env();
    env::set_var("OTP_MAX_ATTEMPTS", "plenty");

    let cfg = OtpConfig::from_env();
    assert_eq!(cfg.max_attempts, OtpConfig::default().max_attempts);
    clear_auth_env();
}
