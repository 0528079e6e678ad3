//! Default column naming.
//!
//! A property without an explicit column name is mapped to the column
//! produced by [`upper_snake_case`]. The input is split at case and digit
//! boundaries: `userId2FA` becomes `USER_ID_2_F_A` and `user_id` stays
//! `USER_ID`.

/// Convert a property name to its default `UPPER_SNAKE_CASE` column name.
#[must_use]
pub fn upper_snake_case(property: &str) -> String {
    let chars: Vec<char> = property.chars().collect();
    let mut out = String::with_capacity(property.len() + 4);
    let mut idx = 0;

    while idx < chars.len() {
        idx = if chars[idx].is_ascii_digit() {
            digit_run(&chars, idx, &mut out)
        } else {
            word_run(&chars, idx, &mut out)
        };
    }
    out
}

/// Emit a run of digits. Returns the index after the run.
fn digit_run(chars: &[char], mut idx: usize, out: &mut String) -> usize {
    while idx < chars.len() {
        out.extend(chars[idx].to_lowercase());
        idx += 1;
        if idx < chars.len() && !chars[idx].is_ascii_digit() {
            out.push('_');
            break;
        }
    }
    idx
}

/// Emit a word starting at `idx`, uppercased. The word ends before the next
/// uppercase letter or digit.
fn word_run(chars: &[char], mut idx: usize, out: &mut String) -> usize {
    while idx < chars.len() {
        out.extend(chars[idx].to_uppercase());
        idx += 1;
        if idx < chars.len() && (chars[idx].is_uppercase() || chars[idx].is_ascii_digit()) {
            out.push('_');
            break;
        }
    }
    idx
}
