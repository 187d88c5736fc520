use std::fmt::Write;

use chrono::NaiveDate;

use crate::metrics::ImpactSummary;
use crate::models::DistributionEntry;

fn write_distribution(output: &mut String, title: &str, entries: &[DistributionEntry]) {
    let _ = writeln!(output, "### {title}");
    if entries.is_empty() {
        let _ = writeln!(output, "No data for this scope.");
    } else {
        for entry in entries {
            let _ = writeln!(
                output,
                "- {}: {} ({}%)",
                entry.label, entry.count, entry.percentage
            );
        }
    }
    let _ = writeln!(output);
}

pub fn build_report(scope: &str, today: NaiveDate, summary: &ImpactSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Painel de Impacto");
    let _ = writeln!(output, "Generated on {today} for {scope}");
    let _ = writeln!(output);

    let _ = writeln!(output, "## Headline");
    let _ = writeln!(
        output,
        "- {} students in {} classes, {} instructors, {} prospects",
        summary.total_students,
        summary.total_classes,
        summary.total_instructors,
        summary.total_prospects
    );
    let _ = writeln!(output, "- Completion rate: {}%", summary.completion_rate);
    let _ = writeln!(output, "- Dropout rate: {}%", summary.dropout_rate);
    let _ = writeln!(output, "- Attendance rate: {}%", summary.attendance_rate);
    let _ = writeln!(output, "- Seat occupancy: {}%", summary.seat_occupancy_rate);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Status Mix");
    let students: Vec<String> = summary
        .student_status
        .iter()
        .map(|(status, count)| format!("{status} {count}"))
        .collect();
    let classes: Vec<String> = summary
        .class_status
        .iter()
        .map(|(status, count)| format!("{status} {count}"))
        .collect();
    let _ = writeln!(output, "- Students: {}", students.join(", "));
    let _ = writeln!(output, "- Classes: {}", classes.join(", "));
    let _ = writeln!(output);

    let _ = writeln!(output, "## Students");
    write_distribution(&mut output, "Top neighborhoods", &summary.neighborhoods);
    write_distribution(&mut output, "Age brackets", &summary.student_age_brackets);

    let _ = writeln!(output, "## Prospects");
    write_distribution(&mut output, "Gender", &summary.prospects_by_gender);
    write_distribution(&mut output, "Ethnicity", &summary.prospects_by_ethnicity);
    write_distribution(&mut output, "Schooling", &summary.prospects_by_schooling);

    let _ = writeln!(output, "## Courses");
    write_distribution(
        &mut output,
        "Education level",
        &summary.courses_by_education_level,
    );

    let _ = writeln!(output, "## Instructor Ranking");
    if summary.ranking.is_empty() {
        let _ = writeln!(output, "No active instructors in this scope.");
    } else {
        for (position, record) in summary.ranking.iter().take(10).enumerate() {
            let _ = writeln!(
                output,
                "{}. {} score {:.1} (attendance {}%, {} diaries, {} this month, {} active / {} finished classes, {} students)",
                position + 1,
                record.name,
                record.score(),
                record.average_attendance_rate,
                record.diaries_logged,
                record.diaries_this_month,
                record.active_classes,
                record.finished_classes,
                record.total_students
            );
        }
    }

    output
}
