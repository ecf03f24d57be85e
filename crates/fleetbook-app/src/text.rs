// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Language;

/// Static user-facing strings. Swapped wholesale by language, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Welcome,
    Email,
    Password,
    SignIn,
    RememberMe,
    ForgotPassword,
    PasswordResetUnavailable,
    LanguageToggle,
    SearchPlaceholder,
    ConfirmDeleteTitle,
    ConfirmDeleteBody,
    NoRowSelectedTitle,
    NoRowSelectedBody,
    SelectRowAlert,
    UpcomingDeadline,
}

impl Text {
    pub const fn get(self, language: Language) -> &'static str {
        match language {
            Language::English => self.english(),
            Language::Japanese => self.japanese(),
        }
    }

    const fn english(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome! Enter Email ID and Password",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::SignIn => "Sign in",
            Self::RememberMe => "Remember me",
            Self::ForgotPassword => "Forgot password?",
            Self::PasswordResetUnavailable => "Password reset is not available offline",
            Self::LanguageToggle => "日本語",
            Self::SearchPlaceholder => "Search...",
            Self::ConfirmDeleteTitle => "Confirm Delete",
            Self::ConfirmDeleteBody => "Are you sure you want to delete this item?",
            Self::NoRowSelectedTitle => "No Row Selected",
            Self::NoRowSelectedBody => "Please select a row before deleting.",
            Self::SelectRowAlert => "Please select a row",
            Self::UpcomingDeadline => "Upcoming Deadline",
        }
    }

    const fn japanese(self) -> &'static str {
        match self {
            Self::Welcome => "ようこそ！ メールアドレスとパスワードを入力してください",
            Self::Email => "メ－ル",
            Self::Password => "パスワード",
            Self::SignIn => "ログイン",
            Self::RememberMe => "ログイン状態を保持する",
            Self::ForgotPassword => "パスワードをお忘れですか？",
            Self::PasswordResetUnavailable => "オフラインではパスワードを再設定できません",
            Self::LanguageToggle => "English",
            Self::SearchPlaceholder => "検索...",
            Self::ConfirmDeleteTitle => "削除の確認",
            Self::ConfirmDeleteBody => "この項目を削除してもよろしいですか？",
            Self::NoRowSelectedTitle => "行が選択されていません",
            Self::NoRowSelectedBody => "削除する前に行を選択してください。",
            Self::SelectRowAlert => "行を選択してください",
            Self::UpcomingDeadline => "期限が近づいています",
        }
    }
}
