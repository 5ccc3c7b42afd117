//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 课程列表上的查询
//!
//! 对已获取的课程列表做单次线性扫描，不维护额外索引，也不缓存结果。

use ahash::AHashSet as HashSet;

use crate::constants::{AI_SERIES_ID, ART_SERIES_ID, BASIC_SERIES_ID};
use crate::model::CourseBrief;

/// 按级别过滤课程，`series_id > 0` 时再按系列过滤
pub fn filter_by_level_and_series(
    courses: &[CourseBrief],
    level: i8,
    series_id: i8,
) -> Vec<CourseBrief> {
    courses
        .iter()
        .filter(|course| course.level == level)
        .filter(|course| series_id <= 0 || course.series_id == series_id)
        .cloned()
        .collect()
}

/// 按ID查找课程摘要
pub fn find_brief(courses: &[CourseBrief], course_id: i64) -> Option<CourseBrief> {
    courses.iter().find(|course| course.id == course_id).cloned()
}

/// 课程所属的系列ID，去重并保持在课程列表中首次出现的顺序
pub fn series_ids_of(courses: &[CourseBrief], course_ids: &[i64]) -> Vec<i8> {
    if course_ids.is_empty() {
        return Vec::new();
    }

    let wanted: HashSet<i64> = course_ids.iter().copied().collect();
    let mut seen = HashSet::new();
    courses
        .iter()
        .filter(|course| wanted.contains(&course.id))
        .filter(|course| seen.insert(course.series_id))
        .map(|course| course.series_id)
        .collect()
}

/// 系列下的全部课程ID，按课程列表顺序
pub fn course_ids_in_series(courses: &[CourseBrief], series_id: i8) -> Vec<i64> {
    courses
        .iter()
        .filter(|course| course.series_id == series_id)
        .map(|course| course.id)
        .collect()
}

/// 应用ID对应的基础系列ID，未知应用回落到主应用的基础系列
pub fn app_basic_series_id(app_id: i8) -> i8 {
    match app_id {
        0 => BASIC_SERIES_ID,
        1 => AI_SERIES_ID,
        2 => ART_SERIES_ID,
        _ => BASIC_SERIES_ID,
    }
}
