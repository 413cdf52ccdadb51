/// Активный модальный диалог.
///
/// Единственное значение вместо набора независимых булевых флагов:
/// одновременно открытым может быть не более одного диалога.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveModal {
    /// Ни один диалог не открыт.
    #[default]
    None,
    /// Диалог входа.
    SignIn,
    /// Диалог регистрации.
    SignUp,
    /// Диалог редактирования профиля.
    ProfileEditor,
    /// Диалог создания поста.
    NewPost,
}

impl ActiveModal {
    /// Открывает диалог; любой другой открытый диалог при этом закрывается.
    pub fn open(&mut self, modal: ActiveModal) {
        *self = modal;
    }

    /// Закрывает диалог, только если именно он сейчас открыт.
    pub fn close(&mut self, modal: ActiveModal) {
        if *self == modal {
            *self = ActiveModal::None;
        }
    }

    /// Открыт ли указанный диалог.
    pub fn is_open(&self, modal: ActiveModal) -> bool {
        *self == modal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_replaces_previous_modal() {
        let mut modal = ActiveModal::default();
        modal.open(ActiveModal::SignIn);
        modal.open(ActiveModal::SignUp);

        assert!(modal.is_open(ActiveModal::SignUp));
        assert!(!modal.is_open(ActiveModal::SignIn));
    }

    #[test]
    fn close_of_inactive_modal_is_noop() {
        let mut modal = ActiveModal::default();
        modal.open(ActiveModal::NewPost);
        modal.close(ActiveModal::SignIn);

        assert!(modal.is_open(ActiveModal::NewPost));
    }

    #[test]
    fn close_of_active_modal_resets_to_none() {
        let mut modal = ActiveModal::default();
        modal.open(ActiveModal::ProfileEditor);
        modal.close(ActiveModal::ProfileEditor);

        assert_eq!(modal, ActiveModal::None);
    }
}
