//! Built-in university enquiry table used when no knowledge file is configured.

/// Reference question/answer pairs, in display order.
pub(super) const BUILTIN_FAQS: [(&str, &str); 20] = [
    (
        "what courses are available",
        "Our university offers B.Tech, M.Tech, MBA, MCA, BBA, BCA, B.Sc, M.Sc, Law, and PhD programs.",
    ),
    (
        "what is the admission process",
        "You can apply online through our admission portal. Some courses require entrance exams, while others are based on merit.",
    ),
    (
        "what is the fee structure",
        "The fee varies depending on the course. Please check the official website fee section for detailed information.",
    ),
    (
        "where is the university located",
        "We are located on Mussoorie Road, Dehradun, Uttarakhand.",
    ),
    (
        "what are the hostel facilities",
        "Hostels are available for both boys and girls with mess, Wi-Fi, laundry, 24/7 security, and medical facilities.",
    ),
    (
        "what is the placement record",
        "We have a strong placement record with recruiters like Google, Microsoft, Infosys, TCS, Wipro, and Amazon.",
    ),
    (
        "what scholarships are available",
        "We provide scholarships based on merit, financial need, sports achievements, and government schemes.",
    ),
    (
        "how to apply for scholarships",
        "You can apply during admission by submitting required documents. Scholarship forms are available on the official portal.",
    ),
    (
        "what are the library facilities",
        "The library has thousands of books, journals, e-resources, digital labs, and quiet study areas.",
    ),
    (
        "what sports facilities are available",
        "We have cricket, football, basketball, badminton, tennis, athletics, and indoor games facilities.",
    ),
    (
        "are there extracurricular activities",
        "Yes! We have cultural fests, technical clubs, music, dance, theater, debate, photography, and entrepreneurship clubs.",
    ),
    (
        "what is the exam pattern",
        "Most programs follow a semester system with mid-term and end-term exams, along with internal assessments.",
    ),
    (
        "is there a transportation facility",
        "Yes, university buses operate across the city for students and staff.",
    ),
    (
        "what is the attendance policy",
        "Students are required to maintain at least 75% attendance in each subject.",
    ),
    (
        "are internships provided",
        "Yes, internships are arranged through industry tie-ups, career cell, and student-industry connect programs.",
    ),
    (
        "what is the ragging policy",
        "Our university has a strict anti-ragging policy with zero tolerance.",
    ),
    (
        "is there an alumni network",
        "Yes, we have a global alumni network with regular meetups and mentoring opportunities.",
    ),
    (
        "what are the canteen facilities",
        "We have multiple canteens offering vegetarian, non-vegetarian, and healthy food options at affordable prices.",
    ),
    (
        "are international students allowed",
        "Yes, we welcome international students and provide dedicated support for visas, accommodation, and orientation.",
    ),
    (
        "how can i contact the university",
        "You can call +91-844591583 or email dituniversity.edu.in.",
    ),
];

/// Topic groups advertised next to the topic list.
pub const TOPIC_HIGHLIGHTS: [&str; 4] = [
    "📚 Courses & Admissions",
    "💰 Fee Structure & Scholarships",
    "🏫 Location & Hostel",
    "💼 Placements & Internships",
];
