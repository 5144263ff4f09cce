mod mastery;
mod matches;
mod summoner;
