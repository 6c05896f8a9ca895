// PostgreSQL repository implementations (impl ... for PgUnitOfWork)
pub mod auth;
pub mod wallet;
pub mod ledger;

/// 검색어를 `ILIKE ... ESCAPE '\'` 용 부분 일치 패턴으로 변환
/// (`%`, `_`, `\` 는 문자 그대로 매칭)
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
