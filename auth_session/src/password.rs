//! Password quality scoring for the password reset and update flows.

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Coarse strength tier: one point each for length, uppercase, lowercase,
/// digit and special character; four or more is strong, two or more medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

fn criteria(password: &str) -> [bool; 5] {
    [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    ]
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let score = criteria(password).iter().filter(|&&met| met).count();
    match score {
        4.. => PasswordStrength::Strong,
        2..=3 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    }
}

/// Requirements the password does not yet meet, in display order.
pub fn unmet_requirements(password: &str) -> Vec<&'static str> {
    const LABELS: [&str; 5] = [
        "At least 8 characters",
        "One uppercase letter",
        "One lowercase letter",
        "One number",
        "One special character",
    ];

    criteria(password)
        .iter()
        .zip(LABELS)
        .filter(|&(&met, _)| !met)
        .map(|(_, label)| label)
        .collect()
}
