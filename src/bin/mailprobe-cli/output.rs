use mailprobe::{CheckReport, DomainPolicyReport, RecordFinding};

pub fn print_human(report: &CheckReport) {
    print_policy(&report.policy);

    println!();
    let email = &report.address.original;
    if report.is_deliverable() {
        println!("Email {email} is valid");
    } else {
        println!("Email {email} is invalid: {}", report.probe.outcome);
    }
}

fn print_policy(policy: &DomainPolicyReport) {
    println!();
    println!("Results for domain: {}", policy.domain);

    match &policy.mx {
        RecordFinding::Found(records) => {
            println!("Has MX records: true");
            for record in records {
                println!("  host: {}, preference: {}", record.exchange, record.preference);
            }
        }
        RecordFinding::Absent => println!("Has MX records: false"),
        RecordFinding::Failed { message } => println!("MX lookup failed: {message}"),
    }

    match &policy.spf {
        RecordFinding::Found(spf) => {
            println!("Has SPF record: true");
            println!("  SPF record: {}", spf.record);
            if let Some(qualifier) = spf.qualifier {
                println!("  SPF all-qualifier: {qualifier}");
            }
        }
        RecordFinding::Absent => println!("Has SPF record: false"),
        RecordFinding::Failed { message } => println!("SPF lookup failed: {message}"),
    }

    match &policy.dmarc {
        RecordFinding::Found(dmarc) => {
            println!("Has DMARC record: true");
            println!("  DMARC record: {}", dmarc.record);
            if let Some(dmarc_policy) = dmarc.policy {
                println!("  DMARC policy: {dmarc_policy}");
            }
        }
        RecordFinding::Absent => println!("Has DMARC record: false"),
        RecordFinding::Failed { message } => println!("DMARC lookup failed: {message}"),
    }
}
