use rand::{distributions::Uniform, Rng};

/// Produces the short-lived numeric codes delivered by email or SMS.
/// Injected through [`crate::state::AppState`] so flows never reach for
/// ambient randomness directly.
pub trait OtpGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random digits, leading zeros allowed.
#[derive(Debug, Clone)]
pub struct RandomOtp {
    len: usize,
}

impl RandomOtp {
    pub const DEFAULT_LEN: usize = 5;

    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomOtp {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEN)
    }
}

impl OtpGenerator for RandomOtp {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Uniform::new(0u32, 10))
            .take(self.len)
            .map(|d| d.to_string())
            .collect()
    }
}

/// Deterministic generator for tests and local tooling.
#[derive(Debug, Clone)]
pub struct FixedOtp(pub &'static str);

impl OtpGenerator for FixedOtp {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generates_five_digits() {
        let otp = RandomOtp::default().generate();
        assert_eq!(otp.len(), 5);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn custom_length_is_respected() {
        let otp = RandomOtp::new(8).generate();
        assert_eq!(otp.len(), 8);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn fixed_generator_is_deterministic() {
        let otp = FixedOtp("12345");
        assert_eq!(otp.generate(), "12345");
        assert_eq!(otp.generate(), "12345");
    }
}
