pub mod login_usecase;
