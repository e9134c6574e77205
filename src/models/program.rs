//! The program aggregate.
//!
//! A [`Program`] owns every entity of one generation run: subjects,
//! curricula, combinations, groups and teachers, plus the two teacher
//! lookup tables the search consults (fixed bindings and the auto-select
//! pool). Entities are added once while loading; afterwards only hour
//! counters and timetables change.

use std::collections::{BTreeMap, HashMap};

use super::{
    Combination, Curriculum, CurriculumEntry, CurriculumKey, GradePlan, Group, GroupId, Subject,
    SubjectId, Teacher, TeacherId,
};

/// Key of an explicit teacher binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectAssignmentKey {
    /// Group label.
    pub group: GroupId,
    /// Subject taught.
    pub subject: SubjectId,
}

impl SubjectAssignmentKey {
    /// Creates a binding key.
    pub fn new(group: impl Into<GroupId>, subject: SubjectId) -> Self {
        Self {
            group: group.into(),
            subject,
        }
    }
}

/// Scheduling input and state for one run.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Subjects by identity.
    pub subjects: BTreeMap<SubjectId, Subject>,
    /// Groups by label.
    pub groups: BTreeMap<GroupId, Group>,
    /// Weekly hours per `(grade, subject)`.
    pub curriculum: Curriculum,
    /// Teachers by identity.
    pub teachers: BTreeMap<TeacherId, Teacher>,
    /// `(group, subject)` → the teacher bound to it.
    pub subject_assignment: BTreeMap<SubjectAssignmentKey, TeacherId>,
    /// Subject → auto-select teachers, in declaration order.
    pub unassigned_teachers: BTreeMap<SubjectId, Vec<TeacherId>>,
    /// Lesson-order templates shared by all groups.
    pub combinations: Vec<Combination>,
    subject_names: HashMap<String, SubjectId>,
    teacher_names: HashMap<String, TeacherId>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subject under the next identity.
    ///
    /// Returns `None` when a subject with the same name exists.
    pub fn add_subject(&mut self, subject: Subject) -> Option<SubjectId> {
        if self.subject_names.contains_key(&subject.name) {
            return None;
        }
        let id = SubjectId(self.subjects.len() as u32 + 1);
        self.subject_names.insert(subject.name.clone(), id);
        self.subjects.insert(id, subject);
        Some(id)
    }

    /// Registers a teacher under the next identity.
    ///
    /// Returns `None` when a teacher with the same name exists.
    pub fn add_teacher(&mut self, teacher: Teacher) -> Option<TeacherId> {
        if self.teacher_names.contains_key(&teacher.name) {
            return None;
        }
        let id = TeacherId(self.teachers.len() as u32 + 1);
        self.teacher_names.insert(teacher.name.clone(), id);
        self.teachers.insert(id, teacher);
        Some(id)
    }

    /// Adds a group; `false` if the label is taken.
    pub fn add_group(&mut self, label: impl Into<GroupId>, group: Group) -> bool {
        let label = label.into();
        if self.groups.contains_key(&label) {
            return false;
        }
        self.groups.insert(label, group);
        true
    }

    /// Adds a curriculum line; `false` if the key is taken.
    pub fn add_curriculum(&mut self, key: CurriculumKey, entry: CurriculumEntry) -> bool {
        if self.curriculum.contains_key(&key) {
            return false;
        }
        self.curriculum.insert(key, entry);
        true
    }

    /// Appends a lesson-order template.
    pub fn add_combination(&mut self, combination: Combination) {
        self.combinations.push(combination);
    }

    /// Binds `teacher` to teach `subject` to `group`.
    pub fn bind_teacher(&mut self, group: impl Into<GroupId>, subject: SubjectId, teacher: TeacherId) {
        self.subject_assignment
            .insert(SubjectAssignmentKey::new(group, subject), teacher);
    }

    /// Adds `teacher` to the auto-select pool of `subject`.
    pub fn register_autoselect(&mut self, subject: SubjectId, teacher: TeacherId) {
        let pool = self.unassigned_teachers.entry(subject).or_default();
        if !pool.contains(&teacher) {
            pool.push(teacher);
        }
    }

    /// Identity of a subject by name, `UNASSIGNED` when unknown.
    pub fn resolve_subject(&self, name: &str) -> SubjectId {
        self.subject_id(name).unwrap_or(SubjectId::UNASSIGNED)
    }

    /// Identity of a subject by name.
    pub fn subject_id(&self, name: &str) -> Option<SubjectId> {
        self.subject_names.get(name).copied()
    }

    /// Identity of a teacher by name.
    pub fn teacher_id(&self, name: &str) -> Option<TeacherId> {
        self.teacher_names.get(name).copied()
    }

    /// Name of a subject by identity.
    pub fn subject_name(&self, id: SubjectId) -> Option<&str> {
        self.subjects.get(&id).map(|s| s.name.as_str())
    }

    /// Teacher explicitly bound to `(group, subject)`.
    pub fn assigned_teacher(&self, group: &str, subject: SubjectId) -> Option<TeacherId> {
        self.subject_assignment
            .get(&SubjectAssignmentKey::new(group, subject))
            .copied()
    }

    /// Auto-select pool of `subject` (empty when nobody volunteered).
    pub fn autoselect_pool(&self, subject: SubjectId) -> &[TeacherId] {
        self.unassigned_teachers
            .get(&subject)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Curriculum of one grade.
    pub fn grade_plan(&self, grade: &str) -> GradePlan {
        GradePlan::for_grade(&self.curriculum, grade)
    }

    /// Total lessons across all teacher timetables.
    pub fn committed_lessons(&self) -> usize {
        self.teachers.values().map(|t| t.timetable.len()).sum()
    }
}
