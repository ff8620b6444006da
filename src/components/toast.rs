use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::form::{deliver, ContactMessage, Submission};

#[derive(Properties, PartialEq, Clone)]
pub struct ToastProps {
    pub message: ContactMessage,
    pub acknowledgment: String,
}

/// Non-blocking acknowledgment for one contact form submission.
#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let status = use_state(|| Submission::Pending);

    {
        let status = status.clone();
        let message = props.message.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    status.set(Submission::from(deliver(message).await));
                });
                || ()
            },
            (),
        );
    }

    let (class, text) = match &*status {
        Submission::Pending => ("toast pending", "Wysyłanie wiadomości...".to_string()),
        Submission::Sent => ("toast sent", props.acknowledgment.clone()),
        Submission::Failed(reason) => ("toast failed", format!("Nie udało się wysłać wiadomości: {}", reason)),
    };

    html! {
        <>
            <style>
                {r#"
                    #toast-root {
                        position: fixed;
                        right: 24px;
                        bottom: 24px;
                        display: flex;
                        flex-direction: column;
                        gap: 12px;
                        z-index: 1000;
                    }
                    .toast {
                        max-width: 360px;
                        padding: 16px 20px;
                        border-radius: 8px;
                        color: #fff;
                        background: #1a3a2e;
                        box-shadow: 0 8px 24px rgba(0,0,0,0.2);
                        animation: toastIn 0.3s ease-out;
                    }
                    .toast.pending { opacity: 0.85; }
                    .toast.failed { background: #8a2c2c; }
                    @keyframes toastIn {
                        from { transform: translateY(20px); opacity: 0; }
                        to { transform: translateY(0); opacity: 1; }
                    }
                "#}
            </style>
            <div class={class} role="status">{ text }</div>
        </>
    }
}
