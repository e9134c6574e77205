//! Builds a [`Program`] from [`Settings`].
//!
//! # Order
//! 1. Subjects (identities in first-seen order).
//! 2. Lesson-order templates.
//! 3. Curricula.
//! 4. Teachers, their shift groups and subject occupations.
//!
//! Subjects must come first because every later section refers to them by
//! name.

use std::collections::BTreeSet;

use tracing::debug;

use super::{split_list, ConfigurationError, Settings, TeacherDecl};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{
    Combination, CurriculumEntry, CurriculumKey, Group, GroupId, Program, Shift, Subject,
    SubjectId, Teacher, TeacherId, TeacherSubject, WeekdaySet,
};

/// A loaded program and the conditions found while loading it.
#[derive(Debug, Clone)]
pub struct LoadedProgram {
    /// Program built from the settings.
    pub program: Program,
    /// Non-fatal conditions, in the order found.
    pub diagnostics: Vec<Diagnostic>,
}

/// Validates `settings` and builds the program.
///
/// Only structural problems are errors; duplicate declarations and unknown
/// subject names are reported in [`LoadedProgram::diagnostics`].
pub fn load(settings: &Settings) -> Result<LoadedProgram, ConfigurationError> {
    settings.validate()?;

    let mut loader = Loader::default();
    loader.fill_subjects(settings);
    loader.fill_combinations(settings);
    loader.fill_curriculum(settings);
    loader.fill_teachers(settings);

    debug!(
        subjects = loader.program.subjects.len(),
        combinations = loader.program.combinations.len(),
        groups = loader.program.groups.len(),
        teachers = loader.program.teachers.len(),
        diagnostics = loader.diagnostics.len(),
        "configuration loaded"
    );

    Ok(LoadedProgram {
        program: loader.program,
        diagnostics: loader.diagnostics.into_vec(),
    })
}

#[derive(Default)]
struct Loader {
    program: Program,
    diagnostics: Diagnostics,
}

impl Loader {
    fn fill_subjects(&mut self, settings: &Settings) {
        for decl in &settings.subjects {
            let subject = Subject::new(decl.name.trim())
                .with_no_split(decl.no_split.is_yes())
                .with_one_group(decl.one_group.is_yes());
            if self.program.add_subject(subject).is_none() {
                self.diagnostics.push(Diagnostic::duplicate(
                    "subject",
                    format!("Subject '{}' is declared more than once", decl.name.trim()),
                ));
            }
        }
    }

    fn fill_combinations(&mut self, settings: &Settings) {
        for (index, decl) in settings.combinations.iter().enumerate() {
            let combination: Combination = split_list(&decl.day_plan)
                .map(|name| self.resolve(name, "combination", index))
                .collect();
            self.program.add_combination(combination);
        }
    }

    fn fill_curriculum(&mut self, settings: &Settings) {
        for grade in &settings.grades {
            let grade_name = grade.name.trim();
            for (index, line) in grade.curriculum.iter().enumerate() {
                let subject = self.resolve(line.name.trim(), "curriculum", index);
                let key = CurriculumKey::new(grade_name, subject);
                let entry = CurriculumEntry::new(line.hours, WeekdaySet::parse(&line.days_of_week));
                if !self.program.add_curriculum(key, entry) {
                    self.diagnostics.push(Diagnostic::duplicate(
                        "curriculum",
                        format!(
                            "Grade '{grade_name}' lists subject '{}' more than once",
                            line.name.trim()
                        ),
                    ));
                }
            }
        }
    }

    fn fill_teachers(&mut self, settings: &Settings) {
        for decl in &settings.teachers {
            let name = decl.name.trim();
            let Some(teacher_id) = self.program.add_teacher(Teacher::new(name)) else {
                self.diagnostics.push(Diagnostic::duplicate(
                    "teacher",
                    format!("Teacher '{name}' is declared more than once"),
                ));
                continue;
            };

            let mut default_groups = BTreeSet::new();
            self.fill_groups(decl.morning.as_deref(), Shift::Morning, teacher_id, &mut default_groups);
            self.fill_groups(
                decl.afternoon.as_deref(),
                Shift::Afternoon,
                teacher_id,
                &mut default_groups,
            );
            self.fill_occupations(decl, teacher_id, &default_groups);
        }
    }

    /// Declares the groups of one shift; they join the teacher's default set.
    fn fill_groups(
        &mut self,
        list: Option<&str>,
        shift: Shift,
        teacher_id: TeacherId,
        default_groups: &mut BTreeSet<GroupId>,
    ) {
        let Some(list) = list else {
            return;
        };
        for label in split_list(list) {
            default_groups.insert(label.to_string());
            if !self
                .program
                .add_group(label, Group::new(label, shift, teacher_id))
            {
                self.diagnostics.push(Diagnostic::duplicate(
                    "group",
                    format!("Group '{label}' is declared by more than one teacher"),
                ));
            }
        }
    }

    fn fill_occupations(
        &mut self,
        decl: &TeacherDecl,
        teacher_id: TeacherId,
        default_groups: &BTreeSet<GroupId>,
    ) {
        for (index, occupation) in decl.occupations.iter().enumerate() {
            let subject = self.resolve(occupation.name.trim(), "occupation", index);
            let any_groups = occupation.any_groups.is_some_and(|flag| flag.is_yes());

            let teacher_subject = if any_groups {
                self.program.register_autoselect(subject, teacher_id);
                TeacherSubject::any_groups()
            } else {
                let groups: BTreeSet<GroupId> = match occupation.group_list.as_deref() {
                    Some(list) if split_list(list).next().is_some() => {
                        split_list(list).map(str::to_string).collect()
                    }
                    _ => default_groups.clone(),
                };
                for group in &groups {
                    self.bind(group, subject, teacher_id, &decl.name);
                }
                TeacherSubject::for_groups(groups)
            };

            if let Some(teacher) = self.program.teachers.get_mut(&teacher_id) {
                teacher.subjects.insert(subject, teacher_subject);
            }
        }
    }

    fn bind(&mut self, group: &str, subject: SubjectId, teacher_id: TeacherId, teacher_name: &str) {
        if let Some(existing) = self.program.assigned_teacher(group, subject) {
            if existing != teacher_id {
                self.diagnostics.push(Diagnostic::duplicate(
                    "binding",
                    format!(
                        "Group '{group}' already has a teacher for {subject}; '{}' is ignored",
                        teacher_name.trim()
                    ),
                ));
            }
            return;
        }
        self.program.bind_teacher(group, subject, teacher_id);
    }

    /// Subject identity by name, recording a diagnostic for unknown names.
    fn resolve(&mut self, name: &str, entity: &str, index: usize) -> SubjectId {
        let id = self.program.resolve_subject(name);
        if !id.is_assigned() {
            self.diagnostics.push(Diagnostic::unresolved(
                entity,
                format!("{entity} #{index} refers to unknown subject '{name}'"),
            ));
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::models::Weekday;

    fn settings(json: &str) -> Settings {
        Settings::from_json_str(json).unwrap()
    }

    fn sample() -> Settings {
        settings(
            r#"{
            "subjects": [
                { "name": "Рисунок", "no_split": "Да", "one_group": "Нет" },
                { "name": "Лепка", "no_split": "Нет", "one_group": "Да" },
                { "name": "Рисунок", "no_split": "Нет", "one_group": "Нет" }
            ],
            "combinations": [
                { "day_plan": "Рисунок, Лепка" },
                { "day_plan": "Лепка,Рисунок,Рисунок" }
            ],
            "grades": [
                { "name": "5", "curriculum": [
                    { "name": "Рисунок", "hours": 3, "days_of_week": "ПнСрПт" },
                    { "name": "Лепка", "hours": 2, "days_of_week": "ВтЧт" },
                    { "name": "Рисунок", "hours": 7, "days_of_week": "Сб" }
                ]}
            ],
            "teachers": [
                { "name": "Иванова", "morning": "5А, 5Б", "occupations": [
                    { "name": "Рисунок" }
                ]},
                { "name": "Петров", "afternoon": "5В", "occupations": [
                    { "name": "Лепка", "any_groups": "Да" },
                    { "name": "Рисунок", "group_list": "5В" }
                ]},
                { "name": "Иванова", "morning": "6А", "occupations": [] }
            ]
        }"#,
        )
    }

    #[test]
    fn test_subjects_first_seen_order() {
        let loaded = load(&sample()).unwrap();
        let p = &loaded.program;
        assert_eq!(p.subjects.len(), 2);
        assert_eq!(p.subject_id("Рисунок"), Some(SubjectId(1)));
        assert_eq!(p.subject_id("Лепка"), Some(SubjectId(2)));
        assert!(p.subjects[&SubjectId(1)].no_split);
        assert!(p.subjects[&SubjectId(2)].one_group);
    }

    #[test]
    fn test_combinations_resolved() {
        let p = load(&sample()).unwrap().program;
        assert_eq!(p.combinations.len(), 2);
        assert_eq!(p.combinations[0].subjects(), &[SubjectId(1), SubjectId(2)]);
        assert_eq!(
            p.combinations[1].subjects(),
            &[SubjectId(2), SubjectId(1), SubjectId(1)]
        );
    }

    #[test]
    fn test_curriculum_duplicate_dropped() {
        let loaded = load(&sample()).unwrap();
        let entry = loaded.program.curriculum[&CurriculumKey::new("5", SubjectId(1))];
        assert_eq!(entry.hours, 3);
        assert!(entry.weekdays.contains(Weekday::Wednesday));
        assert!(!entry.weekdays.contains(Weekday::Saturday));
        assert!(loaded
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::DuplicateDeclaration && d.entity == "curriculum"));
    }

    #[test]
    fn test_groups_and_class_masters() {
        let p = load(&sample()).unwrap().program;
        assert_eq!(p.groups.len(), 3);
        assert_eq!(p.groups["5А"].shift, Shift::Morning);
        assert_eq!(p.groups["5А"].class_master, TeacherId(1));
        assert_eq!(p.groups["5В"].shift, Shift::Afternoon);
        assert_eq!(p.groups["5В"].grade, "5");
        // The duplicate teacher is skipped entirely, including its groups.
        assert!(!p.groups.contains_key("6А"));
    }

    #[test]
    fn test_occupations() {
        let p = load(&sample()).unwrap().program;
        // Default group set of Иванова.
        assert_eq!(p.assigned_teacher("5А", SubjectId(1)), Some(TeacherId(1)));
        assert_eq!(p.assigned_teacher("5Б", SubjectId(1)), Some(TeacherId(1)));
        // Explicit list of Петров.
        assert_eq!(p.assigned_teacher("5В", SubjectId(1)), Some(TeacherId(2)));
        // Auto-select goes to the pool, not the binding table.
        assert_eq!(p.autoselect_pool(SubjectId(2)), &[TeacherId(2)]);
        assert_eq!(p.assigned_teacher("5В", SubjectId(2)), None);
        let petrov = &p.teachers[&TeacherId(2)];
        assert!(petrov.subjects[&SubjectId(2)].autoselect_groups);
        assert!(petrov.subjects[&SubjectId(2)].groups.is_empty());
    }

    #[test]
    fn test_duplicate_diagnostics() {
        let loaded = load(&sample()).unwrap();
        let dup: Vec<_> = loaded
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::DuplicateDeclaration)
            .map(|d| d.entity.as_str())
            .collect();
        assert_eq!(dup, vec!["subject", "curriculum", "teacher"]);
    }

    #[test]
    fn test_unknown_subject_resolves_to_zero() {
        let s = settings(
            r#"{
            "subjects": [{ "name": "Рисунок" }],
            "combinations": [{ "day_plan": "Рисунок, Хор" }],
            "grades": [{ "name": "5", "curriculum": [
                { "name": "Хор", "hours": 2, "days_of_week": "Пн" }
            ]}],
            "teachers": [{ "name": "Иванова", "morning": "5А", "occupations": [
                { "name": "Хор", "any_groups": "Да" }
            ]}]
        }"#,
        );
        let loaded = load(&s).unwrap();
        let p = &loaded.program;
        assert!(p.curriculum.contains_key(&CurriculumKey::new("5", SubjectId::UNASSIGNED)));
        assert_eq!(p.combinations[0].subjects(), &[SubjectId(1), SubjectId::UNASSIGNED]);
        assert_eq!(p.autoselect_pool(SubjectId::UNASSIGNED), &[TeacherId(1)]);
        let unresolved = loaded
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UnresolvableReference)
            .count();
        assert_eq!(unresolved, 3);
    }

    #[test]
    fn test_conflicting_binding_keeps_first() {
        let s = settings(
            r#"{
            "subjects": [{ "name": "Рисунок" }],
            "teachers": [
                { "name": "Иванова", "morning": "5А", "occupations": [{ "name": "Рисунок" }] },
                { "name": "Петров", "occupations": [{ "name": "Рисунок", "group_list": "5А" }] }
            ]
        }"#,
        );
        let loaded = load(&s).unwrap();
        assert_eq!(
            loaded.program.assigned_teacher("5А", SubjectId(1)),
            Some(TeacherId(1))
        );
        assert!(loaded.diagnostics.iter().any(|d| d.entity == "binding"));
    }

    #[test]
    fn test_group_declared_twice() {
        let s = settings(
            r#"{
            "teachers": [
                { "name": "Иванова", "morning": "5А" },
                { "name": "Петров", "afternoon": "5А" }
            ]
        }"#,
        );
        let loaded = load(&s).unwrap();
        let g = &loaded.program.groups["5А"];
        assert_eq!(g.shift, Shift::Morning);
        assert_eq!(g.class_master, TeacherId(1));
        assert!(loaded.diagnostics.iter().any(|d| d.entity == "group"));
    }

    #[test]
    fn test_invalid_settings_fail() {
        let s = settings(r#"{ "subjects": [{ "name": "" }] }"#);
        assert!(matches!(
            load(&s),
            Err(ConfigurationError::EmptyName { entity: "subject", .. })
        ));
    }
}
