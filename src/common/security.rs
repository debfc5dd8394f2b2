use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Assina um link de download: SHA-256(segredo \0 chave \0 expiração), em hex.
/// O mesmo esquema é usado para gerar e conferir, então qualquer alteração na
/// chave ou na expiração invalida a assinatura.
pub fn sign_download(secret: &str, storage_key: &str, expires_unix: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b"\0");
    hasher.update(storage_key.as_bytes());
    hasher.update(b"\0");
    hasher.update(expires_unix.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Confere assinatura e expiração. Comparação byte a byte sem curto-circuito.
pub fn verify_download(
    secret: &str,
    storage_key: &str,
    expires_unix: i64,
    signature: &str,
    now_unix: i64,
) -> bool {
    if expires_unix < now_unix {
        return false;
    }
    let expected = sign_download(secret, storage_key, expires_unix);
    if expected.len() != signature.len() {
        return false;
    }
    expected
        .bytes()
        .zip(signature.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Token opaco para capturas de localização e redefinição de senha.
pub fn random_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hash de token de uso único guardado no banco (o token em claro só viaja
/// no e-mail/link).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assinatura_valida_dentro_do_prazo() {
        let sig = sign_download("segredo", "orcamentos/abc/arquivo.pdf", 1_000);
        assert!(verify_download("segredo", "orcamentos/abc/arquivo.pdf", 1_000, &sig, 900));
    }

    #[test]
    fn assinatura_expirada_e_rejeitada() {
        let sig = sign_download("segredo", "k", 1_000);
        assert!(!verify_download("segredo", "k", 1_000, &sig, 1_001));
    }

    #[test]
    fn alterar_chave_ou_expiracao_invalida() {
        let sig = sign_download("segredo", "k", 1_000);
        assert!(!verify_download("segredo", "outra", 1_000, &sig, 900));
        assert!(!verify_download("segredo", "k", 2_000, &sig, 900));
        assert!(!verify_download("outro-segredo", "k", 1_000, &sig, 900));
    }

    #[test]
    fn tokens_aleatorios_nao_repetem() {
        assert_ne!(random_token(), random_token());
        assert_eq!(random_token().len(), 32);
    }

    #[test]
    fn hash_de_token_e_deterministico() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
