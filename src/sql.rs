//! Local validation of service-generated SQL before it touches the database.
//!
//! Only read-only statements run: the first keyword after comments must be
//! `SELECT` or `WITH`, and nothing may follow the first `;`.

/// Strip leading whitespace, `-- line` comments, and `/* block */` comments.
fn strip_leading_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
        } else if let Some(rest) = sql.strip_prefix("/*") {
            match rest.split_once("*/") {
                Some((_, tail)) => sql = tail,
                None => return "", // unterminated block comment
            }
        } else {
            return sql;
        }
    }
}

/// Whether `sql` is a single read-only statement we are willing to execute.
pub fn is_sql_valid(sql: &str) -> bool {
    let body = strip_leading_comments(sql);
    if body.is_empty() {
        return false;
    }

    let first_word = body
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if !first_word.eq_ignore_ascii_case("select") && !first_word.eq_ignore_ascii_case("with") {
        return false;
    }

    // Reject stacked statements: anything substantive after the first ';'.
    match body.split_once(';') {
        Some((_, tail)) => tail.trim().is_empty(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_select() {
        assert!(is_sql_valid("SELECT * FROM users"));
        assert!(is_sql_valid("select count(*) from orders;"));
        assert!(is_sql_valid("  SELECT 1"));
    }

    #[test]
    fn test_accepts_cte() {
        assert!(is_sql_valid(
            "WITH t AS (SELECT id FROM users) SELECT count(*) FROM t"
        ));
    }

    #[test]
    fn test_accepts_leading_comments() {
        assert!(is_sql_valid("-- totals per region\nSELECT region, sum(x) FROM t GROUP BY 1"));
        assert!(is_sql_valid("/* generated */ SELECT 1"));
    }

    #[test]
    fn test_rejects_writes() {
        assert!(!is_sql_valid("DELETE FROM users"));
        assert!(!is_sql_valid("DROP TABLE users"));
        assert!(!is_sql_valid("INSERT INTO users VALUES (1)"));
        assert!(!is_sql_valid("UPDATE users SET name = 'x'"));
        assert!(!is_sql_valid("PRAGMA table_info(users)"));
    }

    #[test]
    fn test_rejects_stacked_statements() {
        assert!(!is_sql_valid("SELECT 1; DROP TABLE users"));
        assert!(is_sql_valid("SELECT 1; "));
    }

    #[test]
    fn test_rejects_empty_and_comment_only() {
        assert!(!is_sql_valid(""));
        assert!(!is_sql_valid("   "));
        assert!(!is_sql_valid("-- nothing here"));
        assert!(!is_sql_valid("/* unterminated"));
    }
}
