//! # Template 模块
//!
//! `$name` 风格的文字模板，供 timer / percent 效果使用。
//!
//! ## 语法
//!
//! ```text
//! $$        -> 字面量 "$"
//! $name     -> 变量（标识符：[_A-Za-z][_A-Za-z0-9]*，贪婪匹配）
//! ${name}   -> 变量（花括号形式，可紧跟其他字母）
//! ```
//!
//! `$` 后面跟其他任何字符（或位于末尾）都是错误；
//! 引用未提供的变量也是错误。

use crate::error::TemplateError;

/// 用 `vars` 替换模板中的变量
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }

        let position = i;
        match chars.get(i + 1) {
            Some('$') => {
                out.push('$');
                i += 2;
            }
            Some('{') => {
                let (name, end) = read_identifier(&chars, i + 2)
                    .ok_or(TemplateError::InvalidPlaceholder { position })?;
                if chars.get(end) != Some(&'}') {
                    return Err(TemplateError::InvalidPlaceholder { position });
                }
                out.push_str(lookup(vars, &name)?);
                i = end + 1;
            }
            Some(_) => {
                let (name, end) = read_identifier(&chars, i + 1)
                    .ok_or(TemplateError::InvalidPlaceholder { position })?;
                out.push_str(lookup(vars, &name)?);
                i = end;
            }
            None => return Err(TemplateError::InvalidPlaceholder { position }),
        }
    }

    Ok(out)
}

/// 从 `start` 读取一个标识符，返回标识符和结束位置
fn read_identifier(chars: &[char], start: usize) -> Option<(String, usize)> {
    let first = *chars.get(start)?;
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return None;
    }
    let end = chars[start..]
        .iter()
        .position(|c| !(*c == '_' || c.is_ascii_alphanumeric()))
        .map_or(chars.len(), |offset| start + offset);
    Some((chars[start..end].iter().collect(), end))
}

fn lookup<'a>(vars: &[(&str, &'a str)], name: &str) -> Result<&'a str, TemplateError> {
    vars.iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| TemplateError::MissingKey {
            key: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(substitute("no placeholders", &[]).unwrap(), "no placeholders");
    }

    #[test]
    fn test_named_and_braced() {
        let vars = [("s", "12"), ("cs", "75")];
        assert_eq!(
            substitute("seconds = $s, centiseconds = ${cs}", &vars).unwrap(),
            "seconds = 12, centiseconds = 75"
        );
        assert_eq!(substitute("${s}s left", &vars).unwrap(), "12s left");
    }

    #[test]
    fn test_escaped_dollar() {
        assert_eq!(substitute("cost: $$5", &[]).unwrap(), "cost: $5");
    }

    #[test]
    fn test_identifier_is_greedy() {
        // "$sec" 引用的是 sec 而不是 s
        assert_eq!(
            substitute("$sec", &[("s", "1")]),
            Err(TemplateError::MissingKey {
                key: "sec".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_placeholders() {
        assert_eq!(
            substitute("50 $", &[]),
            Err(TemplateError::InvalidPlaceholder { position: 3 })
        );
        assert_eq!(
            substitute("$ 5", &[]),
            Err(TemplateError::InvalidPlaceholder { position: 0 })
        );
        assert_eq!(
            substitute("${pc", &[("pc", "1")]),
            Err(TemplateError::InvalidPlaceholder { position: 0 })
        );
        assert_eq!(
            substitute("$1", &[]),
            Err(TemplateError::InvalidPlaceholder { position: 0 })
        );
    }

    #[test]
    fn test_unicode_text_around_placeholder() {
        assert_eq!(
            substitute("剩余 $pc 完成", &[("pc", "50.00%")]).unwrap(),
            "剩余 50.00% 完成"
        );
    }
}
