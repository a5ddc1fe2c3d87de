//! 边界校验工具
//!
//! 存储层信任调用方已完成字段归一化（去除空白、科目代码大写等），
//! 这里提供给调用边界使用的格式校验函数。

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static SUBJECT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{2,10}$").expect("Invalid subject code regex"));

static TIME_HHMM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Invalid time regex"));

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{4}$").expect("Invalid academic year regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 科目代码校验：2-10 位大写字母或数字
pub fn validate_subject_code(code: &str) -> Result<(), &'static str> {
    if !SUBJECT_CODE_RE.is_match(code) {
        return Err("Subject code must be 2-10 uppercase letters or digits");
    }
    Ok(())
}

/// 时间格式校验：HH:MM，24 小时制
pub fn validate_time_hhmm(time: &str) -> Result<(), &'static str> {
    if !TIME_HHMM_RE.is_match(time) {
        return Err("Time must be in HH:MM 24-hour format");
    }
    Ok(())
}

/// 学年格式校验：YYYY-YYYY，且后一年为前一年 +1
pub fn validate_academic_year(year: &str) -> Result<(), &'static str> {
    if !ACADEMIC_YEAR_RE.is_match(year) {
        return Err("Academic year must be in YYYY-YYYY format");
    }
    let (start, end) = year.split_at(4);
    let start: i32 = start.parse().map_err(|_| "Academic year is out of range")?;
    let end: i32 = end[1..].parse().map_err(|_| "Academic year is out of range")?;
    if end != start + 1 {
        return Err("Academic year end must be start year + 1");
    }
    Ok(())
}
