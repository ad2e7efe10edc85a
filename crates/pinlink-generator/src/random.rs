use crate::Generator;
use pinlink_core::validate::{GENERATED_SLUG_LENGTH, SLUG_ALPHABET};
use pinlink_core::Slug;
use std::iter;

/// Draws slugs uniformly at random from the 62-character alphanumeric
/// alphabet.
///
/// With the default length of 7 there are 62^7 (about 3.5 * 10^12)
/// possible values.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self {
            length: GENERATED_SLUG_LENGTH,
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Slug {
        let code: String =
            iter::repeat_with(|| SLUG_ALPHABET[rand::random_range(0..SLUG_ALPHABET.len())] as char)
                .take(self.length)
                .collect();
        Slug::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinlink_core::validate_slug;
    use std::collections::HashSet;

    #[test]
    fn generates_seven_alphanumeric_chars() {
        let generator = RandomGenerator::new();
        for _ in 0..1_000 {
            let slug = generator.generate();
            assert_eq!(slug.as_str().len(), 7);
            assert!(slug.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));
            assert!(validate_slug(slug.as_str()));
        }
    }

    #[test]
    fn generated_slugs_vary() {
        let generator = RandomGenerator::new();
        let seen: HashSet<_> = (0..100).map(|_| generator.generate()).collect();
        assert!(seen.len() > 95);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
