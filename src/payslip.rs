//! Payslip rendering and dispatch.
//!
//! The emitter consumes processed payroll rows only. Rendering is plain
//! templating; dispatch goes through [`PayslipDispatcher`] so the fan-out
//! loop can be exercised without a mail server. Per-recipient failures are
//! the caller's to log and skip; nothing here retries.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::model::payroll::PayslipRow;

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Renders one payroll row into the payslip document: identity, pay
/// elements, deductions and net payable, in that order.
pub fn render_payslip(row: &PayslipRow, month: u32, year: i32) -> String {
    let period = format!("{} {}", month_name(month), year);
    format!(
        r#"<html>
<body>
  <h2>PAY SLIP</h2>
  <p>Employee Name: {name}<br/>
     Employee ID: {id}<br/>
     Payslip for the Month: {period}</p>

  <h3>Pay Elements</h3>
  <p>Basic Salary: {basic:.2}<br/>
     HRA: {hra:.2}<br/>
     Conveyance Allowance: {conveyance:.2}<br/>
     Medical Allowance: {medical:.2}<br/>
     Bonus: {bonus:.2}<br/>
     Special Allowance: {special:.2}<br/>
     OT Hours: {ot:.1}</p>

  <h3>Deductions</h3>
  <p>PF Contribution: {pf:.2}<br/>
     ESI Contribution: {esi:.2}<br/>
     Income Tax: {tax:.2}<br/>
     Loan Deduction: {loan:.2}<br/>
     Unpaid Leave Deduction: {unpaid:.2}<br/>
     Penalties: {penalties:.2}<br/>
     Total Deductions: {deductions:.2}</p>

  <h3>Net Payable</h3>
  <p>Gross Salary: {gross:.2}<br/>
     Reimbursements: {reimbursements:.2}<br/>
     Incentives: {incentives:.2}<br/>
     Net Salary: {net:.2}</p>

  <p><small>This is a computer-generated payslip and does not require a signature.</small></p>
</body>
</html>"#,
        name = row.employee_name,
        id = row.employee_id,
        period = period,
        basic = row.basic_salary,
        hra = row.hra,
        conveyance = row.conveyance_allowance,
        medical = row.medical_allowance,
        bonus = row.bonus,
        special = row.special_allowance,
        ot = row.total_ot_hours,
        pf = row.pf_contribution,
        esi = row.esi_contribution,
        tax = row.income_tax,
        loan = row.loan_deduction,
        unpaid = row.unpaid_leave_deduction,
        penalties = row.penalties,
        deductions = row.deductions,
        gross = row.gross_salary,
        reimbursements = row.reimbursements,
        incentives = row.incentives,
        net = row.net_salary,
    )
}

#[async_trait]
pub trait PayslipDispatcher: Send + Sync {
    async fn dispatch(&self, to: &str, subject: &str, body_html: String) -> anyhow::Result<()>;
}

/// SMTP delivery via lettre's async transport.
pub struct SmtpDispatcher {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: lettre::message::Mailbox,
}

impl SmtpDispatcher {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .build();
        Ok(SmtpDispatcher {
            mailer,
            from: config.smtp_from.parse()?,
        })
    }
}

#[async_trait]
impl PayslipDispatcher for SmtpDispatcher {
    async fn dispatch(&self, to: &str, subject: &str, body_html: String) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body_html)?;
        self.mailer.send(email).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn sample_row() -> PayslipRow {
        PayslipRow {
            employee_id: "EMP-001".to_string(),
            employee_name: "John Doe".to_string(),
            basic_salary: 30_000.0,
            hra: 12_000.0,
            conveyance_allowance: 1_600.0,
            special_allowance: 5_000.0,
            medical_allowance: 1_250.0,
            bonus: 2_000.0,
            total_ot_hours: 6.5,
            gross_salary: 51_850.0,
            pf_contribution: 1_800.0,
            esi_contribution: 450.0,
            income_tax: 2_500.0,
            loan_deduction: 1_000.0,
            unpaid_leave_deduction: 0.0,
            penalties: 250.0,
            deductions: 6_000.0,
            reimbursements: 500.0,
            incentives: 0.0,
            net_salary: 45_850.0,
            email: "john.doe@company.com".to_string(),
        }
    }

    #[test]
    fn payslip_contains_every_section() {
        let html = render_payslip(&sample_row(), 3, 2024);
        assert!(html.contains("PAY SLIP"));
        assert!(html.contains("John Doe"));
        assert!(html.contains("March 2024"));
        assert!(html.contains("Pay Elements"));
        assert!(html.contains("Deductions"));
        assert!(html.contains("Net Payable"));
        assert!(html.contains("Basic Salary: 30000.00"));
        assert!(html.contains("Total Deductions: 6000.00"));
        assert!(html.contains("Net Salary: 45850.00"));
    }

    struct RecordingDispatcher {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PayslipDispatcher for RecordingDispatcher {
        async fn dispatch(&self, to: &str, subject: &str, _body: String) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    #[actix_web::test]
    async fn dispatcher_is_object_safe_for_the_fanout() {
        let recorder = RecordingDispatcher {
            sent: Mutex::new(Vec::new()),
        };
        let dispatcher: &dyn PayslipDispatcher = &recorder;
        let row = sample_row();
        let subject = format!("Payslip for {} {}", month_name(3), 2024);
        dispatcher
            .dispatch(&row.email, &subject, render_payslip(&row, 3, 2024))
            .await
            .unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "john.doe@company.com");
        assert_eq!(sent[0].1, "Payslip for March 2024");
    }
}
