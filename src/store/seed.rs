//! Built-in sample data used when no seed file is configured.
//!
//! Counters (`memberCount`, `reviewCount`, `averageRating`) are left at zero;
//! the repository derives them from the nested collections on load.

use crate::models::{
    slugify, Community, CommunityEvent, CommunityLeader, CommunityLocation, CommunityMember,
    CommunityPost, CommunityReview, CommunityStatus, Datastore, MemberRole, Quiz, QuizDifficulty,
    QuizStatus, RescheduledSlot, SessionRequest, SessionStatus, SessionType, TeamMember,
};

const SEED_TIMESTAMP: &str = "2024-06-01T00:00:00Z";

pub fn sample_datastore() -> Datastore {
    Datastore {
        schema_version: 1,
        generated_at: SEED_TIMESTAMP.to_string(),
        revision_id: 0,
        communities: sample_communities(),
        quizzes: sample_quizzes(),
        sessions: sample_sessions(),
        team_members: sample_team_members(),
    }
}

struct CommunitySeed<'a> {
    id: &'a str,
    name: &'a str,
    totem: &'a str,
    category: &'a str,
    description: &'a str,
    tags: &'a [&'a str],
    status: CommunityStatus,
    is_public: bool,
    requires_approval: bool,
    max_members: Option<u32>,
    leader: (&'a str, &'a str),
    members: &'a [&'a str],
    ratings: &'a [u8],
    created_at: &'a str,
    last_activity: &'a str,
}

fn build_community(seed: CommunitySeed<'_>) -> Community {
    let leader_email = format!(
        "{}@communityhub.example",
        slugify(seed.leader.0).replace('-', ".")
    );

    let mut members = vec![CommunityMember {
        id: format!("{}-m0", seed.id),
        name: seed.leader.0.to_string(),
        role: MemberRole::Leader,
        joined_at: seed.created_at.to_string(),
        avatar: None,
    }];
    members.extend(seed.members.iter().enumerate().map(|(i, name)| CommunityMember {
        id: format!("{}-m{}", seed.id, i + 1),
        name: name.to_string(),
        role: if i == 0 {
            MemberRole::Moderator
        } else {
            MemberRole::Member
        },
        joined_at: seed.created_at.to_string(),
        avatar: None,
    }));

    let review_date = seed
        .last_activity
        .get(..10)
        .unwrap_or(seed.last_activity)
        .to_string();

    let reviews = seed
        .ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| CommunityReview {
            id: format!("{}-r{}", seed.id, i + 1),
            user_name: seed
                .members
                .get(i)
                .copied()
                .unwrap_or("Guest")
                .to_string(),
            rating: *rating,
            comment: format!("Rated {} out of 5", rating),
            date: review_date.clone(),
        })
        .collect();

    Community {
        id: seed.id.to_string(),
        slug: slugify(seed.name),
        name: seed.name.to_string(),
        description: seed.description.to_string(),
        detailed_description: format!(
            "{} Led by {}, open to everyone who shares the interest.",
            seed.description, seed.leader.0
        ),
        totem: seed.totem.to_string(),
        category: seed.category.to_string(),
        tags: seed.tags.iter().map(|t| t.to_string()).collect(),
        status: seed.status,
        is_public: seed.is_public,
        requires_approval: seed.requires_approval,
        max_members: seed.max_members,
        leader: CommunityLeader {
            name: seed.leader.0.to_string(),
            role: seed.leader.1.to_string(),
            email: leader_email.clone(),
            avatar: None,
        },
        location: CommunityLocation {
            email: Some(leader_email),
            ..CommunityLocation::default()
        },
        guidelines: vec![
            "Be kind and respectful".to_string(),
            "Stay on topic".to_string(),
        ],
        rules: vec!["No spam or self-promotion".to_string()],
        reviews,
        members,
        events: Vec::new(),
        posts: Vec::new(),
        member_count: 0,
        average_rating: 0.0,
        review_count: 0,
        created_at: seed.created_at.to_string(),
        updated_at: seed.last_activity.to_string(),
        last_activity: seed.last_activity.to_string(),
        version: 1,
    }
}

fn sample_communities() -> Vec<Community> {
    let mut communities = vec![
        build_community(CommunitySeed {
            id: "c-meditation",
            name: "Meditation Masters",
            totem: "🧘",
            category: "Wellness",
            description: "Guided sits and breathing practice for every level.",
            tags: &["mindfulness", "breathing", "calm"],
            status: CommunityStatus::Active,
            is_public: true,
            requires_approval: false,
            max_members: None,
            leader: ("Ana Ribeiro", "Meditation Teacher"),
            members: &["Tomás Lima", "Julia Costa", "Marco Reis", "Lea Santos", "Ivo Prado"],
            ratings: &[5, 5, 4, 5],
            created_at: "2023-01-15T09:00:00Z",
            last_activity: "2024-05-28T18:30:00Z",
        }),
        build_community(CommunitySeed {
            id: "c-books",
            name: "Book Enthusiasts",
            totem: "📚",
            category: "Education",
            description: "A monthly reading circle with lively discussions.",
            tags: &["reading", "literature"],
            status: CommunityStatus::Active,
            is_public: true,
            requires_approval: true,
            max_members: Some(40),
            leader: ("Carla Mendes", "Librarian"),
            members: &["Rui Alves", "Sofia Nunes", "Pedro Dias"],
            ratings: &[4, 5, 4],
            created_at: "2023-03-02T10:00:00Z",
            last_activity: "2024-05-20T20:00:00Z",
        }),
        build_community(CommunitySeed {
            id: "c-hikers",
            name: "Weekend Hikers",
            totem: "🥾",
            category: "Outdoors",
            description: "Trail walks around the city every Saturday morning.",
            tags: &["hiking", "nature"],
            status: CommunityStatus::Active,
            is_public: true,
            requires_approval: false,
            max_members: Some(25),
            leader: ("Bruno Faria", "Trail Guide"),
            members: &["Nina Rocha", "Caio Moura", "Eva Pires", "Davi Luz"],
            ratings: &[4, 4],
            created_at: "2023-06-10T08:00:00Z",
            last_activity: "2024-05-25T07:45:00Z",
        }),
        build_community(CommunitySeed {
            id: "c-parents",
            name: "Mindful Parenting",
            totem: "👨‍👩‍👧",
            category: "Family",
            description: "Support group for parents practicing calm communication.",
            tags: &["parenting", "mindfulness"],
            status: CommunityStatus::Private,
            is_public: false,
            requires_approval: true,
            max_members: Some(12),
            leader: ("Helena Duarte", "Family Therapist"),
            members: &["Olga Brito", "Luis Teles"],
            ratings: &[5],
            created_at: "2023-09-01T12:00:00Z",
            last_activity: "2024-04-30T19:00:00Z",
        }),
        build_community(CommunitySeed {
            id: "c-artists",
            name: "Creative Artists Collective",
            totem: "🎨",
            category: "Arts",
            description: "Share sketches, get feedback and join open studio nights.",
            tags: &["art", "painting", "design"],
            status: CommunityStatus::Draft,
            is_public: true,
            requires_approval: false,
            max_members: None,
            leader: ("Igor Matos", "Illustrator"),
            members: &["Vera Cunha"],
            ratings: &[],
            created_at: "2024-02-14T15:00:00Z",
            last_activity: "2024-02-14T15:00:00Z",
        }),
        build_community(CommunitySeed {
            id: "c-runners",
            name: "Dawn Runners",
            totem: "🏃",
            category: "Outdoors",
            description: "Early morning running club, all paces welcome.",
            tags: &["running", "fitness"],
            status: CommunityStatus::Archived,
            is_public: true,
            requires_approval: false,
            max_members: None,
            leader: ("Rita Gomes", "Coach"),
            members: &["Hugo Vaz", "Clara Sá"],
            ratings: &[3, 4],
            created_at: "2022-04-01T06:00:00Z",
            last_activity: "2023-10-12T06:30:00Z",
        }),
    ];

    if let Some(meditation) = communities.first_mut() {
        meditation.events.push(CommunityEvent {
            id: "c-meditation-e1".to_string(),
            title: "Full Moon Group Sit".to_string(),
            description: "An evening of silent meditation.".to_string(),
            date: "2024-06-21".to_string(),
            time: "19:30".to_string(),
            location: Some("Community Center, Room 2".to_string()),
            attendees: 18,
        });
        meditation.posts.push(CommunityPost {
            id: "c-meditation-p1".to_string(),
            author: "Ana Ribeiro".to_string(),
            title: "Welcome, new members".to_string(),
            content: "Start with five minutes a day and build from there.".to_string(),
            created_at: "2024-05-28T18:30:00Z".to_string(),
            likes: 12,
            comments: 3,
        });
    }

    communities
}

#[allow(clippy::too_many_arguments)]
fn quiz(
    id: &str,
    title: &str,
    category: &str,
    tags: &[&str],
    difficulty: QuizDifficulty,
    status: QuizStatus,
    participants: u32,
    rating: f64,
    created_at: &str,
    last_activity: &str,
) -> Quiz {
    Quiz {
        id: id.to_string(),
        slug: slugify(title),
        title: title.to_string(),
        description: format!("Test your knowledge: {}.", title.to_lowercase()),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        difficulty,
        status,
        is_public: status == QuizStatus::Active,
        question_count: 10,
        participant_count: participants,
        average_rating: rating,
        created_at: created_at.to_string(),
        updated_at: last_activity.to_string(),
        last_activity: last_activity.to_string(),
    }
}

fn sample_quizzes() -> Vec<Quiz> {
    vec![
        quiz(
            "q-stress",
            "Stress Awareness",
            "Wellness",
            &["stress", "mindfulness"],
            QuizDifficulty::Beginner,
            QuizStatus::Active,
            340,
            4.6,
            "2023-11-01T10:00:00Z",
            "2024-05-30T12:00:00Z",
        ),
        quiz(
            "q-communication",
            "Couple Communication Styles",
            "Relationships",
            &["couples", "communication"],
            QuizDifficulty::Intermediate,
            QuizStatus::Active,
            215,
            4.4,
            "2023-12-05T10:00:00Z",
            "2024-05-18T09:00:00Z",
        ),
        quiz(
            "q-sleep",
            "Sleep Hygiene Check",
            "Wellness",
            &["sleep", "habits"],
            QuizDifficulty::Beginner,
            QuizStatus::Draft,
            0,
            0.0,
            "2024-04-10T10:00:00Z",
            "2024-04-10T10:00:00Z",
        ),
        quiz(
            "q-emotions",
            "Emotional Intelligence Deep Dive",
            "Personal Growth",
            &["emotions", "self-awareness"],
            QuizDifficulty::Advanced,
            QuizStatus::Archived,
            98,
            4.1,
            "2022-09-15T10:00:00Z",
            "2023-08-01T10:00:00Z",
        ),
    ]
}

fn sample_team_members() -> Vec<TeamMember> {
    vec![
        TeamMember {
            id: "tm-silva".to_string(),
            name: "Dr. Marta Silva".to_string(),
            role: "Clinical Psychologist".to_string(),
            email: Some("marta.silva@communityhub.example".to_string()),
            active: true,
        },
        TeamMember {
            id: "tm-costa".to_string(),
            name: "João Costa".to_string(),
            role: "Couples Therapist".to_string(),
            email: Some("joao.costa@communityhub.example".to_string()),
            active: true,
        },
        TeamMember {
            id: "tm-neves".to_string(),
            name: "Paula Neves".to_string(),
            role: "Group Facilitator".to_string(),
            email: None,
            active: false,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn session(
    id: &str,
    name: &str,
    session_type: SessionType,
    date: &str,
    time: &str,
    status: SessionStatus,
    assigned: Option<(&str, &str)>,
    rescheduled_to: Option<(&str, &str)>,
) -> SessionRequest {
    SessionRequest {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@mail.example", slugify(name).replace('-', ".")),
        phone: "+351 900 000 000".to_string(),
        session_type,
        date: date.to_string(),
        time: time.to_string(),
        status,
        assigned_to_id: assigned.map(|(id, _)| id.to_string()),
        assigned_to_name: assigned.map(|(_, name)| name.to_string()),
        rescheduled_to: rescheduled_to.map(|(date, time)| RescheduledSlot {
            date: date.to_string(),
            time: time.to_string(),
        }),
        message: None,
        created_at: SEED_TIMESTAMP.to_string(),
        version: 1,
    }
}

fn sample_sessions() -> Vec<SessionRequest> {
    let silva = Some(("tm-silva", "Dr. Marta Silva"));
    let costa = Some(("tm-costa", "João Costa"));

    vec![
        session(
            "s-1001",
            "Laura Pinto",
            SessionType::Individual,
            "2024-06-10",
            "09:00",
            SessionStatus::Confirmed,
            silva,
            None,
        ),
        session(
            "s-1002",
            "André and Bia Castro",
            SessionType::Couple,
            "2024-06-10",
            "10:00",
            SessionStatus::Confirmed,
            silva,
            None,
        ),
        session(
            "s-1003",
            "Miguel Serra",
            SessionType::Initial,
            "2024-06-10",
            "14:00",
            SessionStatus::Rescheduled,
            costa,
            Some(("2024-06-12", "11:00")),
        ),
        session(
            "s-1004",
            "Group: Grief Support",
            SessionType::Group,
            "2024-06-11",
            "18:00",
            SessionStatus::Pending,
            None,
            None,
        ),
        session(
            "s-1005",
            "Teresa Lobo",
            SessionType::Individual,
            "2024-06-10",
            "11:00",
            SessionStatus::Pending,
            None,
            None,
        ),
        session(
            "s-1006",
            "Fábio Ramos",
            SessionType::Individual,
            "2024-06-03",
            "16:00",
            SessionStatus::Completed,
            costa,
            None,
        ),
    ]
}
