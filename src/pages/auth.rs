// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Sign-in and registration forms.
//!
//! The forms only validate and request auth commands; the resulting session
//! is stored by the root model, which reports back via the `*Finished` messages.

use email_address::EmailAddress;

use super::{Failure, PageEvent};
use crate::logic::submission::parse_number;
use crate::models::catalog::{self, Department};
use crate::models::user::ProfileMetadata;

pub const AUTH_FAILED: &str = "Authentication failed. Check your credentials.";
pub const CONFIRM_EMAIL: &str = "Account created. Confirm your email address, then sign in.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    show_password: bool,
    loading: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn shows_password(&self) -> bool {
        self.show_password
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Registration form. Campus, department and program cascade: changing one
/// clears the levels below it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub branch: String,
    pub semester: String,
    pub year: String,
    campus: String,
    department: String,
    program: String,
    loading: bool,
    error: Option<String>,
}

impl RegisterForm {
    pub fn campus(&self) -> &str {
        &self.campus
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Departments selectable for the chosen campus.
    pub fn department_options(&self) -> &'static [Department] {
        catalog::departments(&self.campus)
    }

    /// Programs selectable for the chosen department.
    pub fn program_options(&self) -> &'static [&'static str] {
        catalog::programs(&self.campus, &self.department)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthModel {
    pub login: LoginForm,
    pub register: RegisterForm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMsg {
    LoginEmailChanged(String),
    LoginPasswordChanged(String),
    TogglePasswordVisibility,
    SubmitLogin,
    LoginFinished(Result<(), Failure>),
    RegisterEmailChanged(String),
    RegisterPasswordChanged(String),
    NameChanged(String),
    BranchChanged(String),
    SemesterChanged(String),
    YearChanged(String),
    CampusChanged(String),
    DepartmentChanged(String),
    ProgramChanged(String),
    SubmitRegister,
    /// `Ok(true)` when the account is signed in right away.
    RegisterFinished(Result<bool, Failure>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthCommand {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        metadata: ProfileMetadata,
    },
}

fn failure_text(failure: Failure) -> String {
    if failure.message.trim().is_empty() {
        AUTH_FAILED.to_string()
    } else {
        failure.message
    }
}

pub fn update(model: &mut AuthModel, msg: AuthMsg, cmds: &mut Vec<AuthCommand>) -> Option<PageEvent> {
    let login = &mut model.login;
    let register = &mut model.register;
    match msg {
        AuthMsg::LoginEmailChanged(text) => login.email = text,
        AuthMsg::LoginPasswordChanged(text) => login.password = text,
        AuthMsg::TogglePasswordVisibility => login.show_password = !login.show_password,
        AuthMsg::SubmitLogin => {
            if login.email.trim().is_empty() || login.password.is_empty() {
                let err = "Email and password are required.";
                login.error = Some(err.into());
                return Some(PageEvent::error(err));
            }
            login.loading = true;
            login.error = None;
            cmds.push(AuthCommand::SignIn {
                email: login.email.trim().to_string(),
                password: login.password.clone(),
            });
        }
        AuthMsg::LoginFinished(result) => {
            login.loading = false;
            return match result {
                Ok(()) => {
                    login.password.clear();
                    Some(PageEvent::info("Signed in"))
                }
                Err(failure) => {
                    let text = failure_text(failure);
                    login.error = Some(text.clone());
                    Some(PageEvent::error(text))
                }
            };
        }
        AuthMsg::RegisterEmailChanged(text) => register.email = text,
        AuthMsg::RegisterPasswordChanged(text) => register.password = text,
        AuthMsg::NameChanged(text) => register.name = text,
        AuthMsg::BranchChanged(text) => register.branch = text,
        AuthMsg::SemesterChanged(text) => register.semester = text,
        AuthMsg::YearChanged(text) => register.year = text,
        AuthMsg::CampusChanged(campus) => {
            if register.campus != campus {
                register.campus = campus;
                register.department.clear();
                register.program.clear();
            }
        }
        AuthMsg::DepartmentChanged(department) => {
            if register.department != department {
                register.department = department;
                register.program.clear();
            }
        }
        AuthMsg::ProgramChanged(program) => register.program = program,
        AuthMsg::SubmitRegister => match validate_registration(register) {
            Ok(metadata) => {
                register.loading = true;
                register.error = None;
                cmds.push(AuthCommand::SignUp {
                    email: register.email.trim().to_string(),
                    password: register.password.clone(),
                    metadata,
                });
            }
            Err(err) => {
                register.error = Some(err.clone());
                return Some(PageEvent::error(err));
            }
        },
        AuthMsg::RegisterFinished(result) => {
            register.loading = false;
            return match result {
                Ok(true) => {
                    *register = RegisterForm::default();
                    Some(PageEvent::info("Account created"))
                }
                Ok(false) => {
                    *register = RegisterForm::default();
                    Some(PageEvent::info(CONFIRM_EMAIL))
                }
                Err(failure) => {
                    let text = failure_text(failure);
                    register.error = Some(text.clone());
                    Some(PageEvent::error(text))
                }
            };
        }
    }
    None
}

/// Check the registration form and build the profile payload.
fn validate_registration(form: &RegisterForm) -> Result<ProfileMetadata, String> {
    let email = form.email.trim();
    if !EmailAddress::is_valid(email) {
        return Err("Please enter a valid email address.".into());
    }
    if form.password.is_empty() {
        return Err("Please choose a password.".into());
    }
    if form.name.trim().is_empty() {
        return Err("Please enter your name.".into());
    }
    catalog::validate_affiliation(&form.campus, &form.department, &form.program)
        .map_err(|e| e.to_string())?;

    Ok(ProfileMetadata {
        name: form.name.trim().to_string(),
        branch: form.branch.trim().to_string(),
        college: form.campus.clone(),
        department: form.department.clone(),
        program: form.program.clone(),
        semester: parse_number(&form.semester),
        year: parse_number(&form.year),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(model: &mut AuthModel, msgs: Vec<AuthMsg>) -> Vec<AuthCommand> {
        let mut cmds = Vec::new();
        for msg in msgs {
            update(model, msg, &mut cmds);
        }
        cmds
    }

    fn campus_with_programs() -> (&'static str, &'static str, &'static str) {
        let campus = &catalog::CAMPUSES[0];
        let department = &campus.departments[0];
        (campus.name, department.name, department.programs[0])
    }

    fn filled_registration(model: &mut AuthModel) {
        let (campus, department, program) = campus_with_programs();
        send(
            model,
            vec![
                AuthMsg::RegisterEmailChanged(" asha@uni.edu ".into()),
                AuthMsg::RegisterPasswordChanged("secret".into()),
                AuthMsg::NameChanged("Asha".into()),
                AuthMsg::BranchChanged("CSE".into()),
                AuthMsg::SemesterChanged("4".into()),
                AuthMsg::YearChanged("2".into()),
                AuthMsg::CampusChanged(campus.into()),
                AuthMsg::DepartmentChanged(department.into()),
                AuthMsg::ProgramChanged(program.into()),
            ],
        );
    }

    #[test]
    fn login_requests_sign_in_with_trimmed_email() {
        let mut model = AuthModel::default();
        let cmds = send(
            &mut model,
            vec![
                AuthMsg::LoginEmailChanged(" me@uni.edu ".into()),
                AuthMsg::LoginPasswordChanged("pw".into()),
                AuthMsg::SubmitLogin,
            ],
        );
        assert!(model.login.is_loading());
        assert_eq!(
            cmds,
            vec![AuthCommand::SignIn {
                email: "me@uni.edu".into(),
                password: "pw".into(),
            }]
        );
    }

    #[test]
    fn login_failure_falls_back_to_generic_text() {
        let mut model = AuthModel::default();
        send(&mut model, vec![AuthMsg::LoginFinished(Err(Failure::new("")))]);
        assert_eq!(model.login.error(), Some(AUTH_FAILED));

        send(
            &mut model,
            vec![AuthMsg::LoginFinished(Err(Failure::new("Invalid login credentials")))],
        );
        assert_eq!(model.login.error(), Some("Invalid login credentials"));
        assert!(!model.login.is_loading());
    }

    #[test]
    fn password_visibility_toggles() {
        let mut model = AuthModel::default();
        send(&mut model, vec![AuthMsg::TogglePasswordVisibility]);
        assert!(model.login.shows_password());
        send(&mut model, vec![AuthMsg::TogglePasswordVisibility]);
        assert!(!model.login.shows_password());
    }

    #[test]
    fn changing_campus_clears_department_and_program() {
        let mut model = AuthModel::default();
        filled_registration(&mut model);
        assert!(!model.register.program().is_empty());
        assert!(!model.register.program_options().is_empty());

        let other = catalog::CAMPUSES[1].name;
        send(&mut model, vec![AuthMsg::CampusChanged(other.into())]);
        assert_eq!(model.register.campus(), other);
        assert!(model.register.department().is_empty());
        assert!(model.register.program().is_empty());
        assert!(model.register.program_options().is_empty());
    }

    #[test]
    fn registration_builds_profile_metadata() {
        let mut model = AuthModel::default();
        filled_registration(&mut model);
        let cmds = send(&mut model, vec![AuthMsg::SubmitRegister]);
        let (campus, department, program) = campus_with_programs();
        let [AuthCommand::SignUp { email, metadata, .. }] = cmds.as_slice() else {
            panic!("expected a sign-up command, got {cmds:?}");
        };
        assert_eq!(email, "asha@uni.edu");
        assert_eq!(metadata.college, campus);
        assert_eq!(metadata.department, department);
        assert_eq!(metadata.program, program);
        assert_eq!(metadata.semester, Some(4));
        assert_eq!(metadata.year, Some(2));
    }

    #[test]
    fn invalid_email_is_rejected_locally() {
        let mut model = AuthModel::default();
        filled_registration(&mut model);
        let cmds = send(
            &mut model,
            vec![
                AuthMsg::RegisterEmailChanged("not-an-email".into()),
                AuthMsg::SubmitRegister,
            ],
        );
        assert!(cmds.is_empty());
        assert_eq!(model.register.error(), Some("Please enter a valid email address."));
    }

    #[test]
    fn mismatched_program_is_rejected() {
        let mut model = AuthModel::default();
        filled_registration(&mut model);
        let cmds = send(
            &mut model,
            vec![
                AuthMsg::ProgramChanged("Basket Weaving".into()),
                AuthMsg::SubmitRegister,
            ],
        );
        assert!(cmds.is_empty());
        assert!(model.register.error().unwrap().contains("Basket Weaving"));
    }

    #[test]
    fn confirmation_pending_registration_resets_form() {
        let mut model = AuthModel::default();
        filled_registration(&mut model);
        let event = update(
            &mut model,
            AuthMsg::RegisterFinished(Ok(false)),
            &mut Vec::new(),
        )
        .unwrap();
        assert_eq!(event.message, CONFIRM_EMAIL);
        assert_eq!(model.register, RegisterForm::default());
    }
}
