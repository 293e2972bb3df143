// Copyright 2025 Alexandre D. Díaz
use std::thread;
use std::time::Duration as StdDuration;

use chrono::Duration;
use sessiontoken::{Identity, TokenConfig, TokenError, TokenService, ValidityWindow};

fn service() -> TokenService {
    TokenService::new(&TokenConfig {
        secret: "integration-secret".to_string(),
        window: ValidityWindow::Short,
    })
}

fn operator() -> Identity {
    Identity {
        id: 42,
        name: "operator".to_string(),
        level: 0,
    }
}

#[test]
fn fresh_token_is_valid() {
    let tokens = service();
    let token = tokens.issue_default(&operator()).unwrap();
    let claims = tokens.verify(&token).unwrap();
    assert_eq!(claims.identity(), operator());
    assert!(claims.is_valid());
    assert!(!claims.is_admin());
}

#[test]
fn token_expires_once_its_window_is_over() {
    let tokens = service();
    let token = tokens
        .issue(&operator(), ValidityWindow::Custom(Duration::seconds(1)))
        .unwrap();
    let claims = tokens.verify(&token).unwrap();
    assert!(claims.is_valid());

    thread::sleep(StdDuration::from_millis(2100));
    assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    assert!(!claims.is_valid());
}

#[test]
fn any_altered_character_invalidates_the_token() {
    let tokens = service();
    let token = tokens.issue_default(&operator()).unwrap();
    let payload_start = token.find('.').unwrap() + 1;

    for idx in [1, payload_start + 4, token.len() - 3] {
        let mut chars = token.chars().collect::<Vec<char>>();
        chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
        let altered = chars.into_iter().collect::<String>();
        assert!(
            matches!(tokens.verify(&altered), Err(TokenError::Invalid(_))),
            "mutation at {} was accepted",
            idx
        );
    }
}
