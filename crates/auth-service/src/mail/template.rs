//! Mail bodies

/// HTML body carrying a one-time passcode
pub fn otp_email_template(code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #222;">
    <h2>Confirm your email address</h2>
    <p>Use the code below to continue. It expires in one hour.</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
    <p>If you did not request this code, you can ignore this email.</p>
  </body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_contains_code() {
        let body = otp_email_template("482913");
        assert!(body.contains(">482913<"));
        assert!(body.starts_with("<!DOCTYPE html>"));
    }
}
