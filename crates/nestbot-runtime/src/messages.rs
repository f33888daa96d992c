//! Outbound reply texts. All user-facing copy lives here so the router and
//! tests share one source of truth.

use nestbot_github::IssueRef;
use serde_json::{json, Value};

use crate::intent_store::PendingIntent;
use crate::report::BugPriority;

pub const WELCOME_TEXT: &str = "🏠 *Bienvenue sur NestBot !*\n\n\
Je suis l'assistant de l'application NgonNest. Voici ce que je peux faire :\n\n\
📝 /feedback - Proposer une amélioration\n\
🐛 /bug - Signaler un problème\n\
📊 /status - Vérifier l'état du bot\n\
❓ /help - Afficher l'aide\n\n\
Choisissez une option ci-dessous ou tapez une commande.";

/// Inline keyboard attached to the `/start` reply.
pub fn start_menu_options() -> Value {
    json!({
        "inline_keyboard": [
            [
                { "text": "📝 Feedback", "callback_data": "menu_feedback" },
                { "text": "🐛 Signaler un bug", "callback_data": "menu_bug" }
            ],
            [
                { "text": "📊 Statut", "callback_data": "menu_status" },
                { "text": "❓ Aide", "callback_data": "menu_help" }
            ]
        ]
    })
}

pub const HELP_TEXT: &str = "❓ *Aide NestBot*\n\n\
*Commandes disponibles :*\n\
/start - Afficher le menu principal\n\
/feedback - Envoyer une suggestion d'amélioration\n\
/bug - Signaler un dysfonctionnement\n\
/status - État du bot et de l'intégration GitHub\n\
/cancel - Annuler l'opération en cours\n\
/help - Afficher ce message\n\n\
Après /feedback ou /bug, envoyez simplement votre message : il sera \
transmis à l'équipe de développement.";

pub fn status_text(tracker_configured: bool, repo_slug: &str) -> String {
    let github_line = if tracker_configured {
        "✅ Connecté"
    } else {
        "❌ Token manquant (les rapports ne seront pas transmis)"
    };
    let health = if tracker_configured { "🟢" } else { "🟡" };
    format!(
        "{health} *Statut NestBot*\n\n\
         *Bot :* en ligne\n\
         *GitHub :* {github_line}\n\
         *Dépôt :* `{repo_slug}`"
    )
}

pub fn cancel_text(cancelled: Option<PendingIntent>) -> String {
    match cancelled {
        Some(intent) => format!(
            "✅ Opération *{}* annulée. Tapez /start pour revenir au menu.",
            intent.label()
        ),
        None => "ℹ️ Aucune opération en cours à annuler.".to_string(),
    }
}

pub const FEEDBACK_PROMPT: &str = "📝 *Mode feedback activé*\n\n\
Envoyez votre suggestion d'amélioration en un seul message. \
Tapez /cancel pour abandonner.";

pub const BUG_PROMPT: &str = "🐛 *Mode signalement activé*\n\n\
Décrivez le problème rencontré en un seul message. Mentionnez si \
l'application plante ou se bloque, cela nous aide à prioriser. \
Tapez /cancel pour abandonner.";

pub const UNRECOGNIZED_COMMAND_TEXT: &str =
    "🤔 Commande inconnue. Tapez /help pour la liste des commandes disponibles.";

pub const UNRECOGNIZED_TEXT: &str = "💬 Je n'attends pas de message pour le moment.\n\n\
Utilisez /feedback pour une suggestion ou /bug pour signaler un problème.";

pub fn feedback_confirmation(issue: &IssueRef) -> String {
    format!(
        "✅ *Merci pour votre feedback !*\n\n\
         Votre suggestion a été transmise à l'équipe (ticket #{}).\n\
         Suivi : {}",
        issue.number, issue.url
    )
}

pub fn bug_confirmation(issue: &IssueRef, priority: BugPriority) -> String {
    let priority_text = match priority {
        BugPriority::Urgent => "🚨 urgente",
        BugPriority::High => "🔴 élevée",
        BugPriority::Normal => "🟡 normale",
    };
    format!(
        "✅ *Signalement enregistré !*\n\n\
         Priorité détectée : {priority_text}\n\
         Ticket #{} créé pour l'équipe.\n\
         Suivi : {}",
        issue.number, issue.url
    )
}

pub const FEEDBACK_FAILURE_TEXT: &str = "⚠️ Votre feedback n'a pas pu être transmis \
pour le moment. Réessayez plus tard avec /feedback.";

pub const BUG_FAILURE_TEXT: &str = "⚠️ Votre signalement n'a pas pu être transmis \
pour le moment. Réessayez plus tard avec /bug.";
