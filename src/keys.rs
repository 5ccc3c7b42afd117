//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 缓存键构造
//!
//! 远程存储和本地缓存使用同一套键。每种实体有固定前缀，
//! 派生查询追加描述性后缀，不同实体的键不会冲突。

/// 完整课程列表
pub const COURSES_KEY: &str = "COURSES";

const COURSE_PREFIX: &str = "COURSE";
const LESSON_PREFIX: &str = "LESSON";
const TESTS_SUFFIX: &str = "TESTS";
const COURSE_ID_SUFFIX: &str = "COURSE_ID";

/// 单个课程
pub fn course_key(course_id: i64) -> String {
    format!("{}:{}", COURSE_PREFIX, course_id)
}

/// 单个课时
pub fn lesson_key(lesson_id: i64) -> String {
    format!("{}:{}", LESSON_PREFIX, lesson_id)
}

/// 课程测验
pub fn course_tests_key(course_id: i64) -> String {
    format!("{}:{}:{}", COURSE_PREFIX, course_id, TESTS_SUFFIX)
}

/// 课时测验
pub fn lesson_tests_key(lesson_id: i64) -> String {
    format!("{}:{}:{}", LESSON_PREFIX, lesson_id, TESTS_SUFFIX)
}

/// 课时到课程ID的映射
pub fn lesson_course_id_key(lesson_id: i64) -> String {
    format!("{}:{}:{}", LESSON_PREFIX, lesson_id, COURSE_ID_SUFFIX)
}
