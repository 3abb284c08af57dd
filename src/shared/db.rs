use sea_orm::DbErr;

/// True when Postgres rejected a write because of a unique index (SQLSTATE 23505).
pub fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string().to_lowercase();
    msg.contains("23505") || msg.contains("duplicate key") || msg.contains("unique constraint")
}

/// `ILIKE` pattern matching `term` anywhere, with `\`, `%` and `_` taken literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(" Fil "), "%Fil%");
        assert_eq!(contains_pattern("_"), "%\\_%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn recognises_postgres_unique_errors() {
        assert!(is_unique_violation(&DbErr::Custom(
            "error returned from database: duplicate key value violates unique constraint \"uq_genres_slug\"".into()
        )));
        assert!(is_unique_violation(&DbErr::Custom("SQLSTATE 23505".into())));
        assert!(!is_unique_violation(&DbErr::Custom("connection reset".into())));
    }
}
