//! Interactive menu tree for the console front end.
//!
//! # Responsibility
//! - Map numbered menu choices to `ClinicService` calls.
//! - Render listings and reports as aligned tables.
//!
//! # Invariants
//! - A failed operation is reported and the menu loop continues.
//! - End of input leaves the loop without an error.

use crate::prompt::Prompter;
use crate::table::{money, opt_cell, write_table};
use clinic_core::model::validation::{format_date, format_time, format_timestamp};
use clinic_core::{
    error_code, seed_sample_data, ClinicService, DoctorPatch, NewAppointment, NewBill,
    NewDoctor, NewLabTest, NewPatient, PatientPatch, RepoError,
};
use log::warn;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy)]
enum Action {
    Open(&'static Menu),
    AddPatient,
    ViewPatients,
    UpdatePatient,
    DeletePatient,
    AddDoctor,
    ViewDoctors,
    UpdateDoctor,
    DeleteDoctor,
    ScheduleAppointment,
    ViewAppointments,
    DeleteAppointment,
    OrderLabTest,
    EnterLabResult,
    ViewLabTests,
    ViewPendingLabTests,
    CreateBill,
    ViewBills,
    ViewUnpaidBills,
    MarkBillPaid,
    PatientSummary,
    DoctorWorkload,
    SeedSampleData,
}

#[derive(Debug)]
struct Menu {
    header: &'static str,
    entries: &'static [(&'static str, &'static str, Action)],
    back_label: &'static str,
}

static MAIN_MENU: Menu = Menu {
    header: "\n===============================\n  Clinic & Lab Management\n===============================",
    entries: &[
        ("1", "Patients", Action::Open(&PATIENT_MENU)),
        ("2", "Doctors", Action::Open(&DOCTOR_MENU)),
        ("3", "Appointments", Action::Open(&APPOINTMENT_MENU)),
        ("4", "Lab Tests", Action::Open(&LAB_MENU)),
        ("5", "Billing", Action::Open(&BILLING_MENU)),
        ("6", "Reports", Action::Open(&REPORT_MENU)),
        ("7", "Seed Sample Data", Action::SeedSampleData),
    ],
    back_label: "Exit",
};

static PATIENT_MENU: Menu = Menu {
    header: "\n-- Patients --",
    entries: &[
        ("1", "Add Patient", Action::AddPatient),
        ("2", "View Patients", Action::ViewPatients),
        ("3", "Update Patient", Action::UpdatePatient),
        ("4", "Delete Patient", Action::DeletePatient),
    ],
    back_label: "Back",
};

static DOCTOR_MENU: Menu = Menu {
    header: "\n-- Doctors --",
    entries: &[
        ("1", "Add Doctor", Action::AddDoctor),
        ("2", "View Doctors", Action::ViewDoctors),
        ("3", "Update Doctor", Action::UpdateDoctor),
        ("4", "Delete Doctor", Action::DeleteDoctor),
    ],
    back_label: "Back",
};

static APPOINTMENT_MENU: Menu = Menu {
    header: "\n-- Appointments --",
    entries: &[
        ("1", "Schedule Appointment", Action::ScheduleAppointment),
        ("2", "View Appointments", Action::ViewAppointments),
        ("3", "Delete Appointment", Action::DeleteAppointment),
    ],
    back_label: "Back",
};

static LAB_MENU: Menu = Menu {
    header: "\n-- Lab Tests --",
    entries: &[
        ("1", "Order Lab Test", Action::OrderLabTest),
        ("2", "Enter/Update Lab Result", Action::EnterLabResult),
        ("3", "View Lab Tests", Action::ViewLabTests),
        ("4", "View Pending Lab Tests", Action::ViewPendingLabTests),
    ],
    back_label: "Back",
};

static BILLING_MENU: Menu = Menu {
    header: "\n-- Billing --",
    entries: &[
        ("1", "Create Bill", Action::CreateBill),
        ("2", "View All Bills", Action::ViewBills),
        ("3", "View Unpaid Bills", Action::ViewUnpaidBills),
        ("4", "Mark Bill as Paid", Action::MarkBillPaid),
    ],
    back_label: "Back",
};

static REPORT_MENU: Menu = Menu {
    header: "\n-- Reports --",
    entries: &[
        ("1", "Patient Summary", Action::PatientSummary),
        ("2", "Doctor Workload", Action::DoctorWorkload),
    ],
    back_label: "Back",
};

/// Failure of a single menu action.
#[derive(Debug)]
pub enum MenuError {
    Io(io::Error),
    Repo(RepoError),
}

impl Display for MenuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<io::Error> for MenuError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for MenuError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type ActionResult = Result<(), MenuError>;

/// Console session bound to one service and one input/output pair.
pub struct Console<'s, 'conn, R, W> {
    service: &'s ClinicService<'conn>,
    prompt: Prompter<R, W>,
}

impl<'s, 'conn, R: BufRead, W: Write> Console<'s, 'conn, R, W> {
    pub fn new(service: &'s ClinicService<'conn>, input: R, output: W) -> Self {
        Self {
            service,
            prompt: Prompter::new(input, output),
        }
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        match self.run_menu(&MAIN_MENU) {
            Ok(()) => writeln!(self.out(), "Goodbye!"),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                writeln!(self.out(), "\nExiting...")
            }
            Err(err) => Err(err),
        }
    }

    fn out(&mut self) -> &mut W {
        self.prompt.output()
    }

    fn run_menu(&mut self, menu: &'static Menu) -> io::Result<()> {
        loop {
            writeln!(self.out(), "{}", menu.header)?;
            for (key, label, _) in menu.entries {
                writeln!(self.out(), "{key}) {label}")?;
            }
            writeln!(self.out(), "0) {}", menu.back_label)?;

            let choice = self.prompt.line("Choose: ")?;
            if choice == "0" {
                return Ok(());
            }
            let Some(&(_, _, action)) = menu.entries.iter().find(|(key, _, _)| *key == choice)
            else {
                writeln!(self.out(), "Invalid choice!")?;
                continue;
            };

            match action {
                Action::Open(submenu) => self.run_menu(submenu)?,
                action => {
                    self.perform(action)?;
                    self.prompt.pause()?;
                }
            }
        }
    }

    fn perform(&mut self, action: Action) -> io::Result<()> {
        let result = match action {
            Action::Open(_) => Ok(()),
            Action::AddPatient => self.add_patient(),
            Action::ViewPatients => self.view_patients(),
            Action::UpdatePatient => self.update_patient(),
            Action::DeletePatient => self.delete_patient(),
            Action::AddDoctor => self.add_doctor(),
            Action::ViewDoctors => self.view_doctors(),
            Action::UpdateDoctor => self.update_doctor(),
            Action::DeleteDoctor => self.delete_doctor(),
            Action::ScheduleAppointment => self.schedule_appointment(),
            Action::ViewAppointments => self.view_appointments(),
            Action::DeleteAppointment => self.delete_appointment(),
            Action::OrderLabTest => self.order_lab_test(),
            Action::EnterLabResult => self.enter_lab_result(),
            Action::ViewLabTests => self.view_lab_tests(false),
            Action::ViewPendingLabTests => self.view_lab_tests(true),
            Action::CreateBill => self.create_bill(),
            Action::ViewBills => self.view_bills(false),
            Action::ViewUnpaidBills => self.view_bills(true),
            Action::MarkBillPaid => self.mark_bill_paid(),
            Action::PatientSummary => self.patient_summary(),
            Action::DoctorWorkload => self.doctor_workload(),
            Action::SeedSampleData => self.seed_sample_data(),
        };

        match result {
            Ok(()) => Ok(()),
            Err(MenuError::Io(err)) => Err(err),
            Err(MenuError::Repo(err)) => {
                warn!(
                    "event=menu_action module=cli status=error action={:?} error_code={}",
                    action,
                    error_code(&err)
                );
                writeln!(self.out(), "Error: {err}")
            }
        }
    }

    // Patients

    fn add_patient(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Add Patient ==")?;
        let name = self.prompt.text("Name: ")?;
        let age = self.prompt.int("Age: ", Some(0))?;
        let gender = self.prompt.optional_text("Gender (M/F/Other): ")?;
        let contact = self.prompt.optional_text("Contact: ")?;
        let disease = self.prompt.optional_text("Disease/Complaint: ")?;
        self.view_doctors()?;
        let doctor_id = self
            .prompt
            .optional_int("Assign Doctor ID (blank for none): ", Some(1))?;

        let patient = self.service.add_patient(NewPatient {
            name,
            age,
            gender,
            contact,
            disease,
            doctor_id,
        })?;
        writeln!(self.out(), "Patient added successfully! (ID {})", patient.id)?;
        Ok(())
    }

    fn view_patients(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Patients ==")?;
        let rows: Vec<Vec<String>> = self
            .service
            .list_patients_with_doctor()?
            .into_iter()
            .map(|row| {
                let p = row.patient;
                vec![
                    p.id.to_string(),
                    p.name,
                    p.age.to_string(),
                    opt_cell(p.gender.as_deref()),
                    opt_cell(p.contact.as_deref()),
                    opt_cell(p.disease.as_deref()),
                    opt_cell(row.doctor_name.as_deref()),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &["ID", "Name", "Age", "Gender", "Contact", "Disease", "Doctor"],
            &rows,
        )?;
        Ok(())
    }

    fn update_patient(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Update Patient ==")?;
        self.view_patients()?;
        let id = self.prompt.int("Enter Patient ID to update: ", Some(1))?;
        let Some(current) = self.service.get_patient(id)? else {
            writeln!(self.out(), "Patient not found.")?;
            return Ok(());
        };

        let name = self.prompt.optional_text(&format!("Name [{}]: ", current.name))?;
        let age = self
            .prompt
            .optional_int(&format!("Age [{}]: ", current.age), Some(0))?;
        let gender = self.prompt.optional_text(&format!(
            "Gender [{}]: ",
            opt_cell(current.gender.as_deref())
        ))?;
        let contact = self.prompt.optional_text(&format!(
            "Contact [{}]: ",
            opt_cell(current.contact.as_deref())
        ))?;
        let disease = self.prompt.optional_text(&format!(
            "Disease [{}]: ",
            opt_cell(current.disease.as_deref())
        ))?;

        writeln!(self.out(), "\nAssign/Change Doctor:")?;
        self.view_doctors()?;
        let current_doctor = current
            .doctor_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let doctor_id = self.prompt.optional_int(
            &format!("Doctor ID [{current_doctor}] (blank to keep, 0 to clear): "),
            Some(0),
        )?;

        self.service.update_patient(
            id,
            PatientPatch {
                name,
                age,
                gender,
                contact,
                disease,
                doctor_id: doctor_id.map(|id| (id != 0).then_some(id)),
            },
        )?;
        writeln!(self.out(), "Patient updated successfully!")?;
        Ok(())
    }

    fn delete_patient(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Delete Patient ==")?;
        self.view_patients()?;
        let id = self.prompt.int("Enter Patient ID to delete: ", Some(1))?;
        if self.service.delete_patient(id)? {
            writeln!(self.out(), "Patient deleted.")?;
        } else {
            writeln!(self.out(), "Patient not found.")?;
        }
        Ok(())
    }

    // Doctors

    fn add_doctor(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Add Doctor ==")?;
        let name = self.prompt.text("Name: ")?;
        let specialization = self.prompt.optional_text("Specialization: ")?;
        let contact = self.prompt.optional_text("Contact: ")?;

        let doctor = self.service.add_doctor(NewDoctor {
            name,
            specialization,
            contact,
        })?;
        writeln!(self.out(), "Doctor added successfully! (ID {})", doctor.id)?;
        Ok(())
    }

    fn view_doctors(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Doctors ==")?;
        let rows: Vec<Vec<String>> = self
            .service
            .list_doctors()?
            .into_iter()
            .map(|d| {
                vec![
                    d.id.to_string(),
                    d.name,
                    opt_cell(d.specialization.as_deref()),
                    opt_cell(d.contact.as_deref()),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &["ID", "Name", "Specialization", "Contact"],
            &rows,
        )?;
        Ok(())
    }

    fn update_doctor(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Update Doctor ==")?;
        self.view_doctors()?;
        let id = self.prompt.int("Enter Doctor ID to update: ", Some(1))?;
        let Some(current) = self.service.get_doctor(id)? else {
            writeln!(self.out(), "Doctor not found.")?;
            return Ok(());
        };

        let name = self.prompt.optional_text(&format!("Name [{}]: ", current.name))?;
        let specialization = self.prompt.optional_text(&format!(
            "Specialization [{}]: ",
            opt_cell(current.specialization.as_deref())
        ))?;
        let contact = self.prompt.optional_text(&format!(
            "Contact [{}]: ",
            opt_cell(current.contact.as_deref())
        ))?;

        self.service.update_doctor(
            id,
            DoctorPatch {
                name,
                specialization,
                contact,
            },
        )?;
        writeln!(self.out(), "Doctor updated successfully!")?;
        Ok(())
    }

    fn delete_doctor(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Delete Doctor ==")?;
        self.view_doctors()?;
        let id = self.prompt.int("Enter Doctor ID to delete: ", Some(1))?;
        if self.service.delete_doctor(id)? {
            writeln!(self.out(), "Doctor deleted.")?;
        } else {
            writeln!(self.out(), "Doctor not found.")?;
        }
        Ok(())
    }

    // Appointments

    fn schedule_appointment(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Schedule Appointment ==")?;
        self.view_patients()?;
        let patient_id = self.prompt.int("Patient ID: ", Some(1))?;
        self.view_doctors()?;
        let doctor_id = self.prompt.int("Doctor ID: ", Some(1))?;
        let date = self.prompt.date("Date (YYYY-MM-DD): ")?;
        let time = self.prompt.time("Time (HH:MM, 24h): ")?;
        let notes = self.prompt.optional_text("Notes (optional): ")?;

        let appointment = self.service.schedule_appointment(NewAppointment {
            patient_id,
            doctor_id,
            date,
            time,
            notes,
        })?;
        writeln!(self.out(), "Appointment scheduled! (ID {})", appointment.id)?;
        Ok(())
    }

    fn view_appointments(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Appointments ==")?;
        let rows: Vec<Vec<String>> = self
            .service
            .list_appointment_views()?
            .into_iter()
            .map(|view| {
                let a = view.appointment;
                vec![
                    a.id.to_string(),
                    view.patient_name,
                    view.doctor_name,
                    format_date(a.date),
                    format_time(a.time),
                    opt_cell(a.notes.as_deref()),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &["ID", "Patient", "Doctor", "Date", "Time", "Notes"],
            &rows,
        )?;
        Ok(())
    }

    fn delete_appointment(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Delete Appointment ==")?;
        self.view_appointments()?;
        let id = self.prompt.int("Enter Appointment ID to delete: ", Some(1))?;
        if self.service.delete_appointment(id)? {
            writeln!(self.out(), "Appointment deleted.")?;
        } else {
            writeln!(self.out(), "Appointment not found.")?;
        }
        Ok(())
    }

    // Lab tests

    fn order_lab_test(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Order Lab Test ==")?;
        self.view_patients()?;
        let patient_id = self.prompt.int("Patient ID: ", Some(1))?;
        let test_name = self.prompt.text("Test Name (e.g., CBC, LFT): ")?;
        let cost = self
            .prompt
            .optional_float("Cost (blank for 0): ", Some(0.0))?
            .unwrap_or(0.0);

        let test = self
            .service
            .order_lab_test(NewLabTest::new(patient_id, test_name, cost))?;
        writeln!(self.out(), "Lab test ordered! (ID {})", test.id)?;
        Ok(())
    }

    fn enter_lab_result(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Enter/Update Lab Result ==")?;
        self.view_lab_tests(true)?;
        let id = self.prompt.int("Lab Test ID: ", Some(1))?;
        let result = self.prompt.text("Result: ")?;
        if self.service.record_lab_result(id, &result)?.is_some() {
            writeln!(self.out(), "Lab result saved!")?;
        } else {
            writeln!(self.out(), "Lab test not found.")?;
        }
        Ok(())
    }

    fn view_lab_tests(&mut self, pending_only: bool) -> ActionResult {
        writeln!(self.out(), "\n== Lab Tests ==")?;
        let views = self.service.list_lab_test_views(pending_only)?;
        if pending_only {
            let rows: Vec<Vec<String>> = views
                .into_iter()
                .map(|view| {
                    let t = view.test;
                    vec![
                        t.id.to_string(),
                        view.patient_name,
                        t.test_name,
                        money(t.cost),
                        format_timestamp(t.ordered_on),
                    ]
                })
                .collect();
            write_table(
                self.out(),
                &["ID", "Patient", "Test", "Cost", "Ordered On"],
                &rows,
            )?;
            return Ok(());
        }

        let rows: Vec<Vec<String>> = views
            .into_iter()
            .map(|view| {
                let t = view.test;
                vec![
                    t.id.to_string(),
                    view.patient_name,
                    t.test_name,
                    money(t.cost),
                    format_timestamp(t.ordered_on),
                    opt_cell(t.result.as_deref()),
                    t.reported_on.map(format_timestamp).unwrap_or_default(),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &[
                "ID",
                "Patient",
                "Test",
                "Cost",
                "Ordered On",
                "Result",
                "Reported On",
            ],
            &rows,
        )?;
        Ok(())
    }

    // Billing

    fn create_bill(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Create Bill ==")?;
        self.view_patients()?;
        let patient_id = self.prompt.int("Patient ID: ", Some(1))?;
        let amount = self.prompt.float("Amount: ", Some(0.0))?;
        let description = self
            .prompt
            .optional_text("Description (e.g., Consultation/Lab Test): ")?;

        let bill = self.service.create_bill(NewBill {
            patient_id,
            amount,
            description,
        })?;
        writeln!(self.out(), "Bill created! (ID {})", bill.id)?;
        Ok(())
    }

    fn view_bills(&mut self, unpaid_only: bool) -> ActionResult {
        writeln!(self.out(), "\n== Bills ==")?;
        let rows: Vec<Vec<String>> = self
            .service
            .list_bill_views(unpaid_only)?
            .into_iter()
            .map(|view| {
                let b = view.bill;
                vec![
                    b.id.to_string(),
                    view.patient_name,
                    money(b.amount),
                    opt_cell(b.description.as_deref()),
                    format_date(b.billed_on),
                    if b.paid { "Yes" } else { "No" }.to_string(),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &["ID", "Patient", "Amount", "Description", "Date", "Paid"],
            &rows,
        )?;
        Ok(())
    }

    fn mark_bill_paid(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Mark Bill as Paid ==")?;
        self.view_bills(true)?;
        let id = self.prompt.int("Bill ID: ", Some(1))?;
        if self.service.mark_bill_paid(id)? {
            writeln!(self.out(), "Bill updated!")?;
        } else {
            writeln!(self.out(), "Bill not found.")?;
        }
        Ok(())
    }

    // Reports

    fn patient_summary(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Report: Patient Summary ==")?;
        let rows: Vec<Vec<String>> = self
            .service
            .patient_summary()?
            .into_iter()
            .map(|row| {
                vec![
                    row.patient_id.to_string(),
                    row.name,
                    row.appointments.to_string(),
                    row.lab_tests.to_string(),
                    money(row.unpaid_amount),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &["Patient ID", "Name", "Appointments", "Lab Tests", "Unpaid Amount"],
            &rows,
        )?;
        Ok(())
    }

    fn doctor_workload(&mut self) -> ActionResult {
        writeln!(self.out(), "\n== Report: Doctor Workload ==")?;
        let rows: Vec<Vec<String>> = self
            .service
            .doctor_workload()?
            .into_iter()
            .map(|row| {
                vec![
                    row.doctor_id.to_string(),
                    row.name,
                    opt_cell(row.specialization.as_deref()),
                    row.appointments_count.to_string(),
                    row.patients_assigned.to_string(),
                ]
            })
            .collect();
        write_table(
            self.out(),
            &[
                "Doctor ID",
                "Name",
                "Specialization",
                "Appointments",
                "Patients Assigned",
            ],
            &rows,
        )?;
        Ok(())
    }

    fn seed_sample_data(&mut self) -> ActionResult {
        let summary = seed_sample_data(self.service)?;
        writeln!(
            self.out(),
            "Sample data inserted! ({} doctors, {} patients, {} appointments, {} lab tests, {} bills)",
            summary.doctors,
            summary.patients,
            summary.appointments,
            summary.lab_tests,
            summary.bills
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::db::open_db_in_memory;

    fn run_script(service: &ClinicService<'_>, script: &str) -> String {
        let mut output = Vec::new();
        Console::new(service, script.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn exit_choice_says_goodbye() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let out = run_script(&service, "0\n");
        assert!(out.contains("Clinic & Lab Management"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn closed_input_exits_cleanly() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let out = run_script(&service, "2\n");
        assert!(out.ends_with("\nExiting...\n"));
    }

    #[test]
    fn invalid_choice_is_reported() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let out = run_script(&service, "9\n0\n");
        assert!(out.contains("Invalid choice!"));
    }

    #[test]
    fn add_and_view_doctor_through_menus() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let script = "2\n1\nDr. A. Sen\nCardiology\n\n\n2\n\n0\n0\n";
        let out = run_script(&service, script);

        assert!(out.contains("Doctor added successfully!"));
        assert!(out.contains("| Dr. A. Sen | Cardiology     |"));
        assert_eq!(service.list_doctors().unwrap().len(), 1);
    }

    #[test]
    fn add_patient_with_doctor_shows_joined_name() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let doctor = service.add_doctor(NewDoctor::new("Dr. P. Bose")).unwrap();
        let script = format!("1\n1\nS. Chatterjee\n35\nM\n\nFever\n{}\n\n2\n\n0\n0\n", doctor.id);
        let out = run_script(&service, &script);

        assert!(out.contains("Patient added successfully!"));
        let patients = service.list_patients_with_doctor().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].doctor_name.as_deref(), Some("Dr. P. Bose"));
        assert!(out.contains("Dr. P. Bose"));
    }

    #[test]
    fn failed_operation_is_reported_and_loop_continues() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let script = "3\n1\n42\n7\n2025-09-10\n10:00\n\n\n0\n0\n";
        let out = run_script(&service, script);

        assert!(out.contains("Error: "));
        assert!(out.ends_with("Goodbye!\n"));
        assert!(service.list_appointments().unwrap().is_empty());
    }

    #[test]
    fn seed_then_patient_summary_report() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let out = run_script(&service, "7\n\n6\n1\n\n0\n0\n");

        assert!(out.contains("Sample data inserted! (3 doctors, 3 patients"));
        assert!(out.contains("Unpaid Amount"));
        assert!(out.contains("400.00"));
    }

    #[test]
    fn create_bill_reprompts_on_non_finite_amount() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let patient = service.add_patient(NewPatient::new("M. Das", 56)).unwrap();
        let script = format!("5\n1\n{}\nnan\ninf\n250\nConsultation\n\n0\n0\n", patient.id);
        let out = run_script(&service, &script);

        assert_eq!(out.matches("Please enter a valid number.").count(), 2);
        assert!(!out.contains("Error: "));
        let bills = service.list_bills().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].amount, 250.0);
    }

    #[test]
    fn enter_lab_result_lists_only_pending_tests() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        seed_sample_data(&service).unwrap();
        let pending = service.list_lab_test_views(true).unwrap();
        assert_eq!(pending.len(), 1);

        let script = format!("4\n2\n{}\nSinus rhythm\n\n0\n0\n", pending[0].test.id);
        let out = run_script(&service, &script);

        assert!(out.contains("ECG"));
        assert!(!out.contains("CBC"));
        assert!(out.contains("Lab result saved!"));
        assert!(service.list_lab_test_views(true).unwrap().is_empty());
    }

    #[test]
    fn update_patient_blank_answers_keep_values() {
        let conn = open_db_in_memory().unwrap();
        let service = ClinicService::try_new(&conn).unwrap();
        let patient = service
            .add_patient(NewPatient {
                disease: Some("Fever".to_string()),
                ..NewPatient::new("A. Khan", 42)
            })
            .unwrap();
        let script = format!("1\n3\n{}\n\n43\n\n\n\n\n\n0\n0\n", patient.id);
        run_script(&service, &script);

        let updated = service.get_patient(patient.id).unwrap().unwrap();
        assert_eq!(updated.name, "A. Khan");
        assert_eq!(updated.age, 43);
        assert_eq!(updated.disease.as_deref(), Some("Fever"));
    }
}
