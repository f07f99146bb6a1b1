use blake3::Hasher;

pub fn hash_bytes(prefix: &str, bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    format!("{}:{}", prefix, hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_prefixed_and_stable() {
        let a = hash_bytes("blake3", b"<html></html>");
        let b = hash_bytes("blake3", b"<html></html>");
        assert_eq!(a, b);
        assert!(a.starts_with("blake3:"));
        assert_eq!(a.len(), "blake3:".len() + 64);
        assert_ne!(a, hash_bytes("blake3", b"<html> </html>"));
    }
}
