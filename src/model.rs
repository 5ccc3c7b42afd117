//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 课程目录实体
//!
//! 远程值是写入服务按PascalCase字段名发布的JSON文档。
//! 未知字段被忽略，缺失字段取零值；章节与课时的顺序按原样保留。

use serde::{Deserialize, Serialize};

/// 课程摘要（课程列表中的条目）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CourseBrief {
    pub id: i64,
    pub name: String,
    pub name_en: String,
    pub name_tr: String,
    pub level: i8,
    pub published: bool,
    pub abbreviation: String,
    pub series_id: i8,
    pub series_name: String,
    pub upgrade_test: bool,
    pub category_id: i8,
    pub logo_uri: String,
    pub app_logo_uri: String,
    pub description: String,
    pub description_en: String,
}

/// 章节内的课时
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ChapterLesson {
    pub id: i64,
    pub name: String,
    pub published: bool,
    pub trial: bool,
    pub review: bool,
    pub logo_uri: String,
    #[serde(rename = "LogoHDUri")]
    pub logo_hd_uri: String,
    pub theme_color: String,
    pub description: String,
    #[serde(rename = "DescriptionCN")]
    pub description_cn: String,
}

/// 课程章节
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CourseChapter {
    pub id: i64,
    pub name: String,
    pub lessons: Vec<ChapterLesson>,
}

/// 完整课程（含有序章节和课时）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub name_en: String,
    pub name_tr: String,
    pub level: i8,
    pub published: bool,
    pub abbreviation: String,
    pub series_id: i8,
    pub series_name: String,
    pub upgrade_test: bool,
    pub category_id: i8,
    pub logo_uri: String,
    pub app_logo_uri: String,
    pub description: String,
    pub description_en: String,
    pub chapters: Vec<CourseChapter>,
}

impl Course {
    /// 零ID表示"未找到"占位
    pub fn is_placeholder(&self) -> bool {
        self.id == 0
    }

    fn all_lessons(&self) -> impl Iterator<Item = &ChapterLesson> {
        self.chapters.iter().flat_map(|chapter| chapter.lessons.iter())
    }

    fn chapter_lessons(&self, chapter_id: i64) -> impl Iterator<Item = &ChapterLesson> {
        self.chapters
            .iter()
            .filter(move |chapter| chapter.id == chapter_id)
            .flat_map(|chapter| chapter.lessons.iter())
    }

    /// 课时是否属于本课程的任一章节
    pub fn contains_lesson(&self, lesson_id: i64) -> bool {
        self.all_lessons().any(|lesson| lesson.id == lesson_id)
    }

    /// 按ID查找课时
    pub fn lesson(&self, lesson_id: i64) -> Option<&ChapterLesson> {
        self.all_lessons().find(|lesson| lesson.id == lesson_id)
    }

    /// 按给定ID顺序收集课时，不存在的ID被跳过
    pub fn lessons(&self, lesson_ids: &[i64]) -> Vec<&ChapterLesson> {
        lesson_ids.iter().filter_map(|id| self.lesson(*id)).collect()
    }

    /// 按章节、章节内顺序列出全部课时ID
    pub fn lesson_ids_in_order(&self) -> Vec<i64> {
        self.all_lessons().map(|lesson| lesson.id).collect()
    }

    /// 按顺序列出指定章节的课时ID
    pub fn chapter_lesson_ids_in_order(&self, chapter_id: i64) -> Vec<i64> {
        self.chapter_lessons(chapter_id).map(|lesson| lesson.id).collect()
    }

    pub fn is_upgrade_test_published(&self) -> bool {
        self.upgrade_test
    }

    /// 指定章节中的复习课ID
    pub fn chapter_review_lesson_id(&self, chapter_id: i64) -> Option<i64> {
        self.chapter_lessons(chapter_id)
            .find(|lesson| lesson.review)
            .map(|lesson| lesson.id)
    }

    /// 去掉章节结构后的摘要
    pub fn brief(&self) -> CourseBrief {
        CourseBrief {
            id: self.id,
            name: self.name.clone(),
            name_en: self.name_en.clone(),
            name_tr: self.name_tr.clone(),
            level: self.level,
            published: self.published,
            abbreviation: self.abbreviation.clone(),
            series_id: self.series_id,
            series_name: self.series_name.clone(),
            upgrade_test: self.upgrade_test,
            category_id: self.category_id,
            logo_uri: self.logo_uri.clone(),
            app_logo_uri: self.app_logo_uri.clone(),
            description: self.description.clone(),
            description_en: self.description_en.clone(),
        }
    }
}

/// 课时所属课程的最小信息（仅用于展示）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ChapterCourse {
    pub id: i64,
    pub name: String,
    pub name_en: String,
    pub name_tr: String,
    pub level: i8,
    pub abbreviation: String,
    pub series_id: i8,
    pub series_name: String,
}

/// 课时所属章节的最小信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LessonChapter {
    pub id: i64,
    pub name: String,
    pub course: ChapterCourse,
}

/// 独立获取的课时
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Lesson {
    pub id: i64,
    pub name: String,
    pub published: bool,
    pub trial: bool,
    pub review: bool,
    pub logo_uri: String,
    #[serde(rename = "LogoHDUri")]
    pub logo_hd_uri: String,
    pub theme_color: String,
    pub chapter: LessonChapter,
}

impl Lesson {
    pub fn is_placeholder(&self) -> bool {
        self.id == 0
    }

    /// 反向引用中的课程ID
    pub fn course_id(&self) -> i64 {
        self.chapter.course.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubTest {
    pub id: i64,
}

/// 测验
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Test {
    pub id: i64,
    pub category: String,
    pub tests: Vec<SubTest>,
}

/// 课程测验的反序列化外壳
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CourseTest {
    pub id: i64,
    pub tests: Vec<Test>,
}

/// 课时测验的反序列化外壳
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LessonTest {
    pub id: i64,
    pub tests: Vec<Test>,
}
