//! Generator: the top-level scheduling loop.
//!
//! Groups are processed one at a time in a fresh random order. A group
//! whose search succeeds is committed to the shared teacher timetables
//! before the next group starts, so later groups see its teachers as busy.
//! A failed group keeps an empty timetable and is reported as a gap.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument, warn};

use super::group::{schedule_group, GroupOutcome};
use super::{GapReason, GenerationOutcome, GenerationReport, GeneratorConfig, SchedulingGap};
use crate::config::{load, ConfigurationError, Settings};
use crate::models::{GroupId, GroupTimetable, Program, SlotKey, TeacherId, TeacherLesson};
use crate::projection::ScheduleDocument;

/// A teacher slot found occupied while committing a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{teacher} is already booked at {slot}")]
pub struct CommitConflict {
    /// Teacher whose slot was taken.
    pub teacher: TeacherId,
    /// The taken slot.
    pub slot: SlotKey,
}

/// Timetable generator.
///
/// # Example
///
/// ```
/// use u_timetable::config::{load, Settings};
/// use u_timetable::scheduler::{Generator, GeneratorConfig};
///
/// let settings = Settings::from_json_str(r#"{
///     "subjects": [{ "name": "Рисунок" }],
///     "combinations": [{ "day_plan": "Рисунок" }],
///     "grades": [{ "name": "5", "curriculum": [
///         { "name": "Рисунок", "hours": 1, "days_of_week": "Пн" }
///     ]}],
///     "teachers": [{ "name": "Иванова", "morning": "5А",
///         "occupations": [{ "name": "Рисунок" }] }]
/// }"#).unwrap();
/// let mut program = load(&settings).unwrap().program;
///
/// // One template: C(1, 3) = 0, so the trial count is set explicitly.
/// let generator = Generator::new(GeneratorConfig::new().with_seed(1).with_fixed_attempts(3));
/// let report = generator.generate(&mut program);
/// assert!(report.is_complete());
/// assert_eq!(report.committed_lessons, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Loads `settings`, schedules every group and projects the result.
    pub fn run(&self, settings: &Settings) -> Result<GenerationOutcome, ConfigurationError> {
        let loaded = load(settings)?;
        let mut program = loaded.program;
        let report = self.generate(&mut program);
        Ok(GenerationOutcome {
            schedule: ScheduleDocument::from_program(&program),
            report,
            diagnostics: loaded.diagnostics,
        })
    }

    /// Schedules every group of `program` in place.
    ///
    /// Uses the configured seed, or OS entropy when none is set.
    pub fn generate(&self, program: &mut Program) -> GenerationReport {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.generate_with_rng(program, &mut rng)
    }

    /// Schedules every group of `program` drawing randomness from `rng`.
    ///
    /// Group timetables of `program` are replaced; teacher timetables keep
    /// whatever they held before the run and gain the committed lessons.
    #[instrument(
        skip_all,
        fields(groups = program.groups.len(), combinations = program.combinations.len())
    )]
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        program: &mut Program,
        rng: &mut R,
    ) -> GenerationReport {
        let attempts = self.config.attempt_budget.attempts(program.combinations.len());
        let mut report = GenerationReport {
            attempt_budget: attempts,
            ..Default::default()
        };

        let mut order: Vec<GroupId> = program.groups.keys().cloned().collect();
        order.shuffle(rng);

        for group_id in order {
            let outcome = schedule_group(program, &group_id, attempts, rng);
            let gap = match outcome {
                GroupOutcome::Scheduled {
                    timetable,
                    attempts: used,
                } => match merge_into_teacher_timetable(program, &group_id, &timetable) {
                    Ok(committed) => {
                        report.committed_lessons += committed;
                        report.scheduled.push(group_id.clone());
                        if let Some(group) = program.groups.get_mut(&group_id) {
                            group.timetable = timetable;
                        }
                        continue;
                    }
                    Err(conflict) => self.gap(
                        program,
                        &group_id,
                        used,
                        0,
                        GapReason::CommitConflict {
                            teacher: conflict.teacher,
                            slot: conflict.slot,
                        },
                    ),
                },
                GroupOutcome::Exhausted {
                    attempts: used,
                    remaining_hours,
                } => self.gap(
                    program,
                    &group_id,
                    used,
                    remaining_hours,
                    GapReason::AttemptsExhausted,
                ),
            };

            warn!(
                group = %gap.group,
                attempts = gap.attempts,
                remaining_hours = gap.remaining_hours,
                reason = ?gap.reason,
                "group left unscheduled"
            );
            if let Some(group) = program.groups.get_mut(&group_id) {
                group.timetable.clear();
            }
            report.gaps.push(gap);
        }

        info!(
            scheduled = report.scheduled.len(),
            gaps = report.gaps.len(),
            lessons = report.committed_lessons,
            "timetable generated"
        );
        report
    }

    fn gap(
        &self,
        program: &Program,
        group_id: &str,
        attempts: usize,
        remaining_hours: u32,
        reason: GapReason,
    ) -> SchedulingGap {
        SchedulingGap {
            group: group_id.to_string(),
            grade: program
                .groups
                .get(group_id)
                .map(|g| g.grade.clone())
                .unwrap_or_default(),
            attempts,
            remaining_hours,
            reason,
        }
    }
}

/// Copies a finished group timetable into the teachers' timetables.
///
/// Every slot is re-checked before anything is written; on conflict no
/// lesson is committed. Returns the number of lessons written.
pub fn merge_into_teacher_timetable(
    program: &mut Program,
    group_id: &str,
    timetable: &GroupTimetable,
) -> Result<usize, CommitConflict> {
    for (slot, lesson) in timetable.iter() {
        if !lesson.teacher.is_assigned() {
            continue;
        }
        let free = program
            .teachers
            .get(&lesson.teacher)
            .is_some_and(|t| !t.timetable.is_occupied(slot));
        if !free {
            return Err(CommitConflict {
                teacher: lesson.teacher,
                slot: *slot,
            });
        }
    }

    let mut committed = 0;
    for (slot, lesson) in timetable.iter() {
        let Some(teacher) = program.teachers.get_mut(&lesson.teacher) else {
            continue;
        };
        let entry = TeacherLesson {
            subject: lesson.subject,
            group: group_id.to_string(),
        };
        let inserted = teacher.timetable.insert(*slot, entry);
        debug_assert!(inserted.is_ok(), "slot checked free before writing");
        if inserted.is_ok() {
            committed += 1;
        }
    }
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Combination, CurriculumEntry, CurriculumKey, Group, GroupLesson, Shift, Subject,
        SubjectId, Teacher, Weekday, WeekdaySet,
    };
    use crate::scheduler::AttemptBudget;
    use crate::validation::check_schedule;

    fn lesson(subject: u32, teacher: u32) -> GroupLesson {
        GroupLesson {
            subject: SubjectId(subject),
            teacher: TeacherId(teacher),
        }
    }

    fn slot(weekday: Weekday, n: u8) -> SlotKey {
        SlotKey::new(weekday, Shift::Morning, n)
    }

    fn two_teacher_program() -> Program {
        let mut p = Program::new();
        p.add_subject(Subject::new("Рисунок"));
        p.add_teacher(Teacher::new("Иванова"));
        p.add_teacher(Teacher::new("Петров"));
        p
    }

    #[test]
    fn test_merge_copies_lessons_with_group() {
        let mut p = two_teacher_program();
        let mut tt = GroupTimetable::new();
        tt.insert(slot(Weekday::Monday, 1), lesson(1, 1)).unwrap();
        tt.insert(slot(Weekday::Monday, 2), lesson(1, 2)).unwrap();
        assert_eq!(merge_into_teacher_timetable(&mut p, "5А", &tt), Ok(2));
        let entry = p.teachers[&TeacherId(2)]
            .timetable
            .get(&slot(Weekday::Monday, 2))
            .unwrap();
        assert_eq!(entry.group, "5А");
        assert_eq!(entry.subject, SubjectId(1));
        assert_eq!(p.committed_lessons(), 2);
    }

    #[test]
    fn test_merge_skips_unassigned_teacher() {
        let mut p = two_teacher_program();
        let mut tt = GroupTimetable::new();
        tt.insert(slot(Weekday::Monday, 1), lesson(1, 0)).unwrap();
        tt.insert(slot(Weekday::Monday, 2), lesson(1, 1)).unwrap();
        assert_eq!(merge_into_teacher_timetable(&mut p, "5А", &tt), Ok(1));
        assert_eq!(p.committed_lessons(), 1);
    }

    #[test]
    fn test_merge_conflict_commits_nothing() {
        let mut p = two_teacher_program();
        let mut first = GroupTimetable::new();
        first.insert(slot(Weekday::Monday, 2), lesson(1, 2)).unwrap();
        merge_into_teacher_timetable(&mut p, "5А", &first).unwrap();

        let mut second = GroupTimetable::new();
        second.insert(slot(Weekday::Monday, 1), lesson(1, 1)).unwrap();
        second.insert(slot(Weekday::Monday, 2), lesson(1, 2)).unwrap();
        let err = merge_into_teacher_timetable(&mut p, "5Б", &second).unwrap_err();
        assert_eq!(
            err,
            CommitConflict {
                teacher: TeacherId(2),
                slot: slot(Weekday::Monday, 2)
            }
        );
        assert!(p.teachers[&TeacherId(1)].timetable.is_empty());
        assert_eq!(p.committed_lessons(), 1);
    }

    /// Scenario A: three identical `[Math]` templates, Math 3 h on Mon/Wed/Fri.
    #[test]
    fn test_single_subject_three_days() {
        let mut p = Program::new();
        let math = p.add_subject(Subject::new("Math")).unwrap();
        let teacher = p.add_teacher(Teacher::new("Иванова")).unwrap();
        p.add_group("5А", Group::new("5А", Shift::Morning, teacher));
        p.bind_teacher("5А", math, teacher);
        p.add_curriculum(
            CurriculumKey::new("5", math),
            CurriculumEntry::new(3, WeekdaySet::parse("ПнСрПт")),
        );
        for _ in 0..3 {
            p.add_combination([math].into_iter().collect());
        }

        let report = Generator::new(GeneratorConfig::new().with_seed(11)).generate(&mut p);
        assert!(report.is_complete());
        assert_eq!(report.attempt_budget, 1);

        let group_tt = &p.groups["5А"].timetable;
        assert_eq!(group_tt.count_subject(math), 3);
        let days: Vec<_> = group_tt.iter().map(|(k, _)| k.weekday).collect();
        assert_eq!(days, vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]);

        let teacher_tt = &p.teachers[&teacher].timetable;
        assert_eq!(teacher_tt.len(), 3);
        assert!(teacher_tt.iter().all(|(k, l)| l.group == "5А" && k.number == 1));
    }

    /// Scenario A with a single template: it may be used once, so Math
    /// cannot reach 3 hours.
    #[test]
    fn test_single_template_cannot_cover_three_hours() {
        let mut p = Program::new();
        let math = p.add_subject(Subject::new("Math")).unwrap();
        let teacher = p.add_teacher(Teacher::new("Иванова")).unwrap();
        p.add_group("5А", Group::new("5А", Shift::Morning, teacher));
        p.bind_teacher("5А", math, teacher);
        p.add_curriculum(
            CurriculumKey::new("5", math),
            CurriculumEntry::new(3, WeekdaySet::parse("ПнСрПт")),
        );
        p.add_combination([math].into_iter().collect());

        let report = Generator::new(GeneratorConfig::new().with_seed(11).with_fixed_attempts(5))
            .generate(&mut p);
        let gap = report.gap_for("5А").unwrap();
        assert_eq!(gap.attempts, 5);
        assert_eq!(gap.remaining_hours, 2);
        assert_eq!(gap.reason, GapReason::AttemptsExhausted);
        assert!(p.groups["5А"].timetable.is_empty());
        assert!(p.teachers[&teacher].timetable.is_empty());
    }

    /// Scenario B: two groups share one auto-select teacher on a single day.
    fn shared_teacher_program(pool_size: usize) -> Program {
        let mut p = Program::new();
        let drawing = p.add_subject(Subject::new("Рисунок")).unwrap();
        let master = p.add_teacher(Teacher::new("Классный")).unwrap();
        for i in 0..pool_size {
            let t = p.add_teacher(Teacher::new(format!("Пул {i}"))).unwrap();
            p.register_autoselect(drawing, t);
        }
        p.add_group("5А", Group::new("5А", Shift::Morning, master));
        p.add_group("5Б", Group::new("5Б", Shift::Morning, master));
        p.add_curriculum(
            CurriculumKey::new("5", drawing),
            CurriculumEntry::new(1, WeekdaySet::parse("Пн")),
        );
        p.add_combination([drawing].into_iter().collect());
        p
    }

    #[test]
    fn test_shared_pool_teacher_is_not_double_booked() {
        for seed in 0..10 {
            let mut p = shared_teacher_program(1);
            let report = Generator::new(GeneratorConfig::new().with_seed(seed).with_fixed_attempts(3))
                .generate(&mut p);
            assert_eq!(report.scheduled.len(), 1, "seed {seed}");
            assert_eq!(report.gaps.len(), 1, "seed {seed}");
            assert_eq!(p.committed_lessons(), 1);
            let doc = ScheduleDocument::from_program(&p);
            assert!(check_schedule(&doc).is_ok());
        }
    }

    #[test]
    fn test_second_pool_teacher_takes_other_group() {
        let mut p = shared_teacher_program(2);
        let report = Generator::new(GeneratorConfig::new().with_seed(4).with_fixed_attempts(3))
            .generate(&mut p);
        assert!(report.is_complete());
        let a = p.groups["5А"].timetable.get(&slot(Weekday::Monday, 1)).unwrap();
        let b = p.groups["5Б"].timetable.get(&slot(Weekday::Monday, 1)).unwrap();
        assert_ne!(a.teacher, b.teacher);
    }

    /// Scenario C: an undeclared subject in the curriculum is never satisfied.
    #[test]
    fn test_orphan_curriculum_line_is_a_gap() {
        let mut p = Program::new();
        let drawing = p.add_subject(Subject::new("Рисунок")).unwrap();
        let teacher = p.add_teacher(Teacher::new("Иванова")).unwrap();
        p.add_group("5А", Group::new("5А", Shift::Morning, teacher));
        p.bind_teacher("5А", drawing, teacher);
        p.add_curriculum(
            CurriculumKey::new("5", drawing),
            CurriculumEntry::new(1, WeekdaySet::FULL_WEEK),
        );
        p.add_curriculum(
            CurriculumKey::new("5", SubjectId::UNASSIGNED),
            CurriculumEntry::new(1, WeekdaySet::FULL_WEEK),
        );
        p.add_combination([drawing].into_iter().collect());
        p.add_combination([SubjectId::UNASSIGNED].into_iter().collect());
        p.add_combination([drawing, SubjectId::UNASSIGNED].into_iter().collect());

        let report = Generator::new(GeneratorConfig::new().with_seed(2)).generate(&mut p);
        let gap = report.gap_for("5А").unwrap();
        assert_eq!(gap.attempts, 1);
        assert_eq!(gap.remaining_hours, 1);
        assert_eq!(p.committed_lessons(), 0);
    }

    /// Scenario D: no templates means no trials.
    #[test]
    fn test_no_templates_no_attempts() {
        let mut p = Program::new();
        let teacher = p.add_teacher(Teacher::new("Иванова")).unwrap();
        p.add_group("5А", Group::new("5А", Shift::Morning, teacher));
        p.add_group("6А", Group::new("6А", Shift::Afternoon, teacher));

        let report = Generator::default().generate(&mut p);
        assert_eq!(report.attempt_budget, 0);
        assert_eq!(report.gaps.len(), 2);
        assert!(report.gaps.iter().all(|g| g.attempts == 0));
        assert!(report.scheduled.is_empty());
    }

    #[test]
    fn test_fewer_than_three_templates_get_no_trials() {
        let mut p = Program::new();
        let math = p.add_subject(Subject::new("Math")).unwrap();
        let teacher = p.add_teacher(Teacher::new("Иванова")).unwrap();
        p.add_group("5А", Group::new("5А", Shift::Morning, teacher));
        p.bind_teacher("5А", math, teacher);
        p.add_curriculum(
            CurriculumKey::new("5", math),
            CurriculumEntry::new(1, WeekdaySet::FULL_WEEK),
        );
        p.add_combination([math].into_iter().collect());
        p.add_combination([math, math].into_iter().collect());

        let report = Generator::new(GeneratorConfig::new().with_seed(5)).generate(&mut p);
        assert_eq!(report.attempt_budget, 0);
        assert!(report.scheduled.is_empty());
        let gap = report.gap_for("5А").unwrap();
        assert_eq!(gap.attempts, 0);
        assert_eq!(gap.remaining_hours, 1);
        assert_eq!(p.committed_lessons(), 0);
    }

    #[test]
    fn test_empty_curriculum_group_is_scheduled_without_lessons() {
        let mut p = Program::new();
        let math = p.add_subject(Subject::new("Math")).unwrap();
        let teacher = p.add_teacher(Teacher::new("Иванова")).unwrap();
        p.add_group("5А", Group::new("5А", Shift::Morning, teacher));
        for _ in 0..3 {
            p.add_combination([math].into_iter().collect());
        }

        let report = Generator::new(GeneratorConfig::new().with_seed(1)).generate(&mut p);
        assert!(report.is_scheduled("5А"));
        assert!(!p.groups["5А"].has_lessons());
        assert_eq!(report.committed_lessons, 0);
    }

    /// Three subjects with different weekday sets. Two morning groups share
    /// the bound teachers and a two-teacher pool.
    fn mixed_program() -> Program {
        let mut p = Program::new();
        let drawing = p.add_subject(Subject::new("Рисунок")).unwrap();
        let modelling = p.add_subject(Subject::new("Лепка")).unwrap();
        let choir = p.add_subject(Subject::new("Хор")).unwrap();
        let ivanova = p.add_teacher(Teacher::new("Иванова")).unwrap();
        let kozlova = p.add_teacher(Teacher::new("Козлова")).unwrap();
        for name in ["Петров", "Сидорова"] {
            let t = p.add_teacher(Teacher::new(name)).unwrap();
            p.register_autoselect(modelling, t);
        }
        for label in ["5А", "5Б"] {
            p.add_group(label, Group::new(label, Shift::Morning, ivanova));
            p.bind_teacher(label, drawing, ivanova);
            p.bind_teacher(label, choir, kozlova);
        }
        for (subject, hours, days) in [
            (drawing, 3, "ПнСрПт"),
            (modelling, 2, "ВтЧт"),
            (choir, 1, "ПнВтСрЧтПтСбВс"),
        ] {
            p.add_curriculum(
                CurriculumKey::new("5", subject),
                CurriculumEntry::new(hours, WeekdaySet::parse(days)),
            );
        }
        for subjects in [
            vec![drawing, choir],
            vec![modelling],
            vec![drawing],
            vec![modelling, drawing],
            vec![drawing, modelling],
            vec![choir],
        ] {
            p.add_combination(Combination::new(subjects));
        }
        p
    }

    #[test]
    fn test_scheduled_groups_match_curriculum() {
        let mut scheduled = 0;
        for seed in 0..20 {
            let mut p = mixed_program();
            let report = Generator::new(GeneratorConfig::new().with_seed(seed)).generate(&mut p);
            assert_eq!(report.attempt_budget, 20);
            assert_eq!(report.scheduled.len() + report.gaps.len(), 2);
            assert_eq!(report.committed_lessons, p.committed_lessons());
            assert!(
                check_schedule(&ScheduleDocument::from_program(&p)).is_ok(),
                "seed {seed}"
            );

            for label in &report.scheduled {
                scheduled += 1;
                let group = &p.groups[label];
                let plan = p.grade_plan(&group.grade);

                for (subject, entry) in plan.iter() {
                    assert_eq!(
                        group.timetable.count_subject(subject),
                        entry.hours as usize,
                        "seed {seed}, group {label}, {subject}"
                    );
                }

                let mut used = Vec::new();
                for weekday in Weekday::ALL {
                    let day: Vec<SubjectId> = group
                        .timetable
                        .on_day(weekday)
                        .map(|(_, l)| l.subject)
                        .collect();
                    if day.is_empty() {
                        continue;
                    }
                    let template = p
                        .combinations
                        .iter()
                        .position(|c| c.subjects() == day.as_slice())
                        .unwrap_or_else(|| panic!("seed {seed}: {day:?} is not a template"));
                    assert!(!used.contains(&template), "seed {seed}: template {template} reused");
                    used.push(template);

                    let allowed = day
                        .iter()
                        .any(|&s| plan.get(s).is_some_and(|e| e.weekdays.contains(weekday)));
                    assert!(allowed, "seed {seed}: {weekday} not allowed for {day:?}");
                }
            }
        }
        assert!(scheduled > 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let build = || {
            let mut p = shared_teacher_program(3);
            let report = Generator::new(
                GeneratorConfig::new()
                    .with_seed(99)
                    .with_attempt_budget(AttemptBudget::Fixed(3)),
            )
            .generate(&mut p);
            (report, ScheduleDocument::from_program(&p))
        };
        let (r1, d1) = build();
        let (r2, d2) = build();
        assert_eq!(r1, r2);
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_run_from_settings() {
        let settings = Settings::from_json_str(
            r#"{
            "subjects": [{ "name": "Рисунок" }, { "name": "Лепка" }],
            "combinations": [
                { "day_plan": "Рисунок, Лепка" },
                { "day_plan": "Лепка, Рисунок" },
                { "day_plan": "Рисунок, Рисунок" }
            ],
            "grades": [{ "name": "5", "curriculum": [
                { "name": "Рисунок", "hours": 3, "days_of_week": "ПнВтСр" },
                { "name": "Лепка", "hours": 1, "days_of_week": "ПнВтСр" },
                { "name": "Хор", "hours": 0, "days_of_week": "Пн" }
            ]}],
            "teachers": [
                { "name": "Иванова", "morning": "5А", "occupations": [{ "name": "Рисунок" }] },
                { "name": "Петров", "occupations": [{ "name": "Лепка", "any_groups": "Да" }] }
            ]
        }"#,
        )
        .unwrap();
        let outcome = Generator::new(GeneratorConfig::new().with_seed(3))
            .run(&settings)
            .unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.report.is_complete());
        assert_eq!(outcome.report.committed_lessons, 4);
        assert_eq!(outcome.schedule.teachers.len(), 2);
        assert!(check_schedule(&outcome.schedule).is_ok());
    }
}
