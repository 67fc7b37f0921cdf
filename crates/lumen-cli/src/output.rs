//! Terminal rendering for command results.

use lumen_analysis::DiagnosticResult;
use lumen_research::{AggregateOutcome, ResearchPaper, SearchResult};

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_failures<T>(outcome: &AggregateOutcome<T>) {
    if outcome.is_partial() {
        let names: Vec<&str> = outcome.failed_sources.iter().map(|s| s.as_str()).collect();
        println!("(no response from: {})", names.join(", "));
    }
}

pub fn print_results(outcome: &AggregateOutcome<SearchResult>) {
    if outcome.items.is_empty() {
        println!("No results found.");
    }
    for (i, r) in outcome.items.iter().enumerate() {
        println!("{:>2}. [{} {:.2}] {}", i + 1, r.source, r.relevance_score, r.title);
        if !r.snippet.is_empty() {
            println!("    {}", r.snippet);
        }
        println!("    {}", r.url);
    }
    print_failures(outcome);
}

pub fn print_papers(outcome: &AggregateOutcome<ResearchPaper>) {
    if outcome.items.is_empty() {
        println!("No papers found.");
    }
    for (i, p) in outcome.items.iter().enumerate() {
        print_paper(i + 1, p);
    }
    print_failures(outcome);
}

pub fn print_paper(n: usize, p: &ResearchPaper) {
    let date = p
        .published_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "undated".to_string());
    println!("{:>2}. {} ({}, {})", n, p.title, p.source, date);
    if !p.authors.is_empty() {
        let shown: Vec<&str> = p.authors.iter().take(3).map(String::as_str).collect();
        let more = if p.authors.len() > 3 { " et al." } else { "" };
        println!("    {}{}", shown.join(", "), more);
    }
    if !p.journal.is_empty() {
        println!("    {}", p.journal);
    }
    println!("    id: {}  cited by: {}", p.id, p.citation_count);
    let link = p.link();
    if !link.is_empty() {
        println!("    {link}");
    }
}

pub fn print_diagnostic(r: &DiagnosticResult) {
    println!("{} (SIMULATED)", r.test_type);
    println!("  confidence:     {:.1}%", r.confidence);
    println!("  overall health: {:.1}%  risk: {}", r.overall_health, r.risk_level.as_str());
    section("Findings", &r.findings);
    println!("  Measurements:");
    for (name, value) in &r.detailed_analysis {
        println!("    - {name}: {value}");
    }
    section("Recommendations", &r.recommendations);
    section("Insights", &r.ai_insights);
    section("Follow-up", &r.follow_up_actions);
}

fn section(title: &str, lines: &[String]) {
    println!("  {title}:");
    for line in lines {
        println!("    - {line}");
    }
}
