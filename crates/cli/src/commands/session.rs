//! Staff session commands.

use dine_admin::{AdminConfig, SessionStatus, open_session};
use secrecy::SecretString;

use super::StaffError;

/// Environment variable holding the staff password.
const PASSWORD_ENV: &str = "DINE_PASSWORD";

/// Read the login password from stdin or `DINE_PASSWORD`.
///
/// The password is never accepted as a command-line argument.
pub fn read_password(from_stdin: bool) -> Result<SecretString, StaffError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        return password_from(Some(line), None);
    }
    password_from(None, std::env::var(PASSWORD_ENV).ok())
}

fn password_from(
    stdin_line: Option<String>,
    env: Option<String>,
) -> Result<SecretString, StaffError> {
    stdin_line
        .map(|line| line.trim_end_matches(['\r', '\n']).to_string())
        .or(env)
        .filter(|password| !password.is_empty())
        .map(SecretString::from)
        .ok_or(StaffError::MissingPassword)
}

/// Sign in and persist the session.
pub async fn login(username: &str, password: &SecretString) -> Result<(), StaffError> {
    let config = AdminConfig::from_env()?;
    let mut session = open_session(&config).await?;

    let signed_in = session.login(username, password).await?;
    let role = signed_in
        .role()
        .map_or_else(|| "no staff role".to_string(), |r| r.to_string());
    println!("Signed in as {} ({role})", signed_in.username().unwrap_or(username));
    Ok(())
}

/// Forget the stored session.
pub async fn logout() -> Result<(), StaffError> {
    let config = AdminConfig::from_env()?;
    let mut session = open_session(&config).await?;
    session.logout();
    println!("Signed out");
    Ok(())
}

/// Show who is signed in and until when.
pub async fn whoami() -> Result<(), StaffError> {
    let config = AdminConfig::from_env()?;
    let session = open_session(&config).await?;

    let (Some(current), status) = (session.session(), session.status()) else {
        println!("Not signed in");
        return Ok(());
    };

    let name = current
        .username()
        .or_else(|| current.claims().display_name())
        .unwrap_or("unknown");
    let role = current
        .role()
        .map_or_else(|| "no staff role".to_string(), |r| r.to_string());
    println!("{name} ({role})");
    println!(
        "Access token {} {}",
        if status == SessionStatus::Expired { "expired" } else { "valid until" },
        format_ms(current.access_expires_at_ms())
    );
    if let Some(at) = current.refresh_expires_at_ms() {
        println!("Refresh token valid until {}", format_ms(at));
    }
    Ok(())
}

fn format_ms(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map_or_else(|| ms.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_password_from_stdin_drops_line_ending() {
        let password = password_from(Some("s3cret pass\r\n".to_string()), None).unwrap();
        assert_eq!(password.expose_secret(), "s3cret pass");
    }

    #[test]
    fn test_password_from_env() {
        let password = password_from(None, Some("hunter2".to_string())).unwrap();
        assert_eq!(password.expose_secret(), "hunter2");
    }

    #[test]
    fn test_missing_or_empty_password() {
        assert!(matches!(password_from(None, None), Err(StaffError::MissingPassword)));
        assert!(matches!(
            password_from(None, Some(String::new())),
            Err(StaffError::MissingPassword)
        ));
        assert!(matches!(
            password_from(Some("\n".to_string()), None),
            Err(StaffError::MissingPassword)
        ));
    }
}
