use rand::{distributions::Uniform, thread_rng, Rng};

use crate::auth::application::ports::outgoing::code_generator::{
    ConfirmationCodeGenerator, CONFIRMATION_CODE_LENGTH,
};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Draws codes from the thread-local CSPRNG.
#[derive(Debug, Clone, Default)]
pub struct RandomCodeGenerator;

impl ConfirmationCodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let dist = Uniform::from(0..ALPHABET.len());
        thread_rng()
            .sample_iter(dist)
            .take(CONFIRMATION_CODE_LENGTH)
            .map(|i| ALPHABET[i] as char)
            .collect()
    }
}
